//! Post formatting.

use feedbot_feed::FeedItem;

/// Escape text for Telegram HTML parse mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Turn a tag into a Telegram hashtag body (without the `#`).
///
/// Telegram hashtags end at the first character that is not a letter, digit
/// or underscore, so every other character becomes `_`.
pub fn hashtag_for(tag: &str) -> String {
    tag.trim()
        .trim_start_matches('#')
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Format a feed item as an HTML post.
pub fn format_post(item: &FeedItem, topic_tag: &str, extra_hashtags: &[String]) -> String {
    let hashtags: Vec<String> = std::iter::once(topic_tag)
        .chain(extra_hashtags.iter().map(String::as_str))
        .map(hashtag_for)
        .filter(|h| !h.is_empty())
        .map(|h| format!("#{}", h))
        .collect();

    format!(
        "🧠 <b>{}</b>\n\n🔗 {}\n\n{}",
        html_escape(&item.title),
        html_escape(&item.link),
        hashtags.join(" ")
    )
}
