fn main() {
    // Emit ESP-IDF link arguments only when the espidf feature set is active;
    // host builds (unit/integration tests) need none of it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
