pub mod chat_panel;
pub mod detail_pane;
pub mod entry_list;
pub mod help_bar;
pub mod status_box;
pub mod url_bar;
