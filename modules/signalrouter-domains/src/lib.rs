pub mod channel_route;
pub mod domains;
pub mod models;
pub mod pipeline;
pub mod registry;

pub use channel_route::ChannelRoute;
pub use models::Article;
pub use pipeline::RoutingPipeline;
pub use registry::{ChannelRegistry, CustomChannel, Route, Source};
