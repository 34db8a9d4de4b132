pub mod floating_origin;
