pub mod assertions;
pub mod entity_builder;
pub mod packet_exchange;
pub mod test_lifecycle;
pub mod test_protocol;

pub use entity_builder::TestEntity;
pub use packet_exchange::{deliver_commands, deliver_updates};
pub use test_lifecycle::TestLifecycle;
pub use test_protocol::TestProtocol;
pub use test_transport::TestTransport;
