#[macro_export]
macro_rules! relative_file {
    ($f : expr) => {{
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join($f)
    }};
}

#[macro_export]
macro_rules! reader_from_bytes {
    ($b : expr) => {{
        let buffer: &[u8] = $b.as_bytes();
        BufReader::new(buffer)
    }};
}
