pub mod media_element;
pub mod player_bridge;
pub mod sync_bridge;
