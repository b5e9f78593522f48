//! Utility functions: image IO and logging setup.

pub mod image;

pub use image::{
    create_rgb_image, dynamic_to_gray, dynamic_to_rgb, load_image, load_images_batch,
    load_images_batch_with_threshold, save_image,
};

/// Initializes the tracing subscriber for logging.
///
/// Sets up the subscriber with an environment filter and formatting layer.
/// Typically called once at application start.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
