/// Current UTC timestamp in whole seconds (the unit the image service signs with)
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
