pub fn line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
