pub mod clipboard_bridge;
