pub mod broadcaster;
pub mod handler;
pub mod heartbeat;
pub mod manager;

pub use broadcaster::start_broadcaster;
pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
