use std::sync::Once;

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        crate::utils::logger::try_init().ok();
    });
}
