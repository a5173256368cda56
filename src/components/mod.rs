// ABOUTME: UI components for the TUI interface: header, sidebar, messages, composer

pub mod composer;
pub mod header;
pub mod layout;
pub mod message_list;
pub mod session_list;

pub use composer::ComposerComponent;
pub use header::HeaderComponent;
pub use layout::LayoutComponent;
pub use message_list::MessageListComponent;
pub use session_list::SessionListComponent;
