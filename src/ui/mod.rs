pub mod app;
pub mod inspector;
pub mod medialib;
pub mod preview;
pub mod timeline_widget;
