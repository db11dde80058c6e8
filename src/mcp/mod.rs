//! Model Context Protocol surface: Canvas lookups exposed as tools and a
//! course summary prompt.

pub mod dates;
pub mod server;
pub mod tools;

pub use server::CanvasMcpServer;
pub use tools::CanvasTools;
