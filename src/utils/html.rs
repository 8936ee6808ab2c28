/// Utility functions for Telegram HTML parse mode
///
/// Only `<`, `>` and `&` carry meaning in Telegram's HTML mode, so those are the
/// characters escaped before catalog text is interpolated into a message.
/// Escapes HTML special characters for the HTML parse mode
///
/// # Example
/// ```
/// use cinema_catalog_bot::utils::html::escape_html;
///
/// assert_eq!(escape_html("Tom & Jerry <3"), "Tom &amp; Jerry &lt;3");
/// ```
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
