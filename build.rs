fn main() {
    // ESP-IDF link arguments are only needed for the firmware image;
    // host builds (tests, fuzzing) skip the toolchain entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
