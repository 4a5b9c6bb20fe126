
/// Route log output through the test harness. Safe to call repeatedly.
#[allow(dead_code)]
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
