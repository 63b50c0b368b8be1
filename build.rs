fn main() {
    // Embed Windows version info (shown in Explorer's "Open With" list)
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        let mut res = winres::WindowsResource::new();
        res.set("FileDescription", "Shard");
        res.set("ProductName", "Shard");
        res.compile().unwrap();
    }
}
