/// Glyph for a file name, keyed on extension. The web UI used font-awesome
/// classes for the same mapping.
pub fn icon_for(name: &str) -> &'static str {
    let extension = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "pdf" => "📕",
        "doc" | "docx" => "📘",
        "xls" | "xlsx" => "📗",
        "ppt" | "pptx" => "📙",
        "jpg" | "jpeg" | "png" | "gif" => "🖼",
        "zip" | "rar" => "🗜",
        _ => "📄",
    }
}

#[cfg(test)]
mod tests {
    use super::icon_for;

    #[test]
    fn picks_icon_by_extension() {
        assert_eq!(icon_for("thesis.PDF"), "📕");
        assert_eq!(icon_for("grades.xlsx"), "📗");
        assert_eq!(icon_for("notes.txt"), "📄");
        assert_eq!(icon_for("no-extension"), "📄");
    }
}
