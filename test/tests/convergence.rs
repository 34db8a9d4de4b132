use proptest::prelude::*;

use tether_client::FieldValue;
use tether_test::{deliver_updates, TestEntity, TestLifecycle, TestProtocol, TestTransport};

proptest! {
    #[test]
    fn observer_converges_on_owner_values(
        healths in proptest::collection::vec(any::<i64>(), 1..20),
        names in proptest::collection::vec("[a-z]{0,12}", 1..20),
    ) {
        let mut owner = TestEntity::new(4, TestProtocol::standard());
        let mut owner_transport = TestTransport::new(1);
        let mut owner_lifecycle = TestLifecycle::new();
        owner_lifecycle.own(owner.entity());

        let observer_protocol = TestProtocol::standard();
        let mut observer = TestEntity::new(4, observer_protocol);
        let observer_transport = TestTransport::new(2);
        let mut observer_lifecycle = TestLifecycle::new();
        observer_lifecycle.observe(observer.entity());

        let steps = healths.len().max(names.len());
        for step in 0..steps {
            if let Some(health) = healths.get(step) {
                owner.health.set(*health);
            }
            if let Some(name) = names.get(step) {
                owner.name.set(name.as_str());
            }
            owner.sync.tick(&mut owner_transport, &mut owner_lifecycle);
            owner_transport.advance();
            deliver_updates(
                &mut owner_transport,
                &mut observer.sync,
                &observer_transport,
                &observer_lifecycle,
            );

            prop_assert_eq!(observer.health.get(), owner.health.get());
            prop_assert_eq!(observer.name.get(), owner.name.get());
        }

        // a settled owner has nothing left to say once its stops are out
        for _ in 0..2 {
            owner.sync.tick(&mut owner_transport, &mut owner_lifecycle);
            owner_transport.advance();
        }
        owner_transport.take_updates();
        owner.sync.tick(&mut owner_transport, &mut owner_lifecycle);
        prop_assert!(owner_transport.take_updates().is_empty());
        prop_assert!(matches!(observer.health.get(), FieldValue::Int(_)));
    }
}
