pub mod add_panel;
pub mod connect_screen;
pub mod header;
pub mod help_overlay;
pub mod torrent_list;
