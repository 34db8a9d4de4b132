/// Assert that an update carries exactly the given field bits
#[macro_export]
macro_rules! assert_fields_mask {
    ($update:expr, $($bit:expr),+) => {
        let expected: u64 = 0 $(| (1u64 << $bit))+;
        assert_eq!(
            $update.fields_mask.bits(),
            expected,
            "Unexpected fields mask on {}",
            $update.component_type
        );
    };
}

/// Assert that an update carries exactly the given stop bits
#[macro_export]
macro_rules! assert_stopped_mask {
    ($update:expr) => {
        assert!(
            $update.stopped_mask.is_clear(),
            "Unexpected stop bits on {}",
            $update.component_type
        );
    };
    ($update:expr, $($bit:expr),+) => {
        let expected: u64 = 0 $(| (1u64 << $bit))+;
        assert_eq!(
            $update.stopped_mask.bits(),
            expected,
            "Unexpected stopped mask on {}",
            $update.component_type
        );
    };
}
