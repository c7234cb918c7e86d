//! 终端输出功能测试

use hq::presentation::theme::Theme;

#[test]
fn test_source_badge_indicators() {
    // 测试数据来源标识
    let cache_with_emoji = "💾 [缓存]";
    let cache_plain = "[缓存]";
    let online_with_emoji = "🌐 [在线]";
    let online_plain = "[在线]";

    assert!(cache_with_emoji.contains("[缓存]"));
    assert!(online_with_emoji.contains("[在线]"));
    assert!(!cache_plain.contains('💾'));
    assert!(!online_plain.contains('🌐'));
}

#[test]
fn test_clear_screen_sequence() {
    // 测试 ANSI 清屏序列
    let seq = "\x1B[2J\x1B[1;1H";

    assert!(seq.starts_with('\x1B'));
    assert!(seq.contains("[2J"));
    assert!(seq.contains("[1;1H"));
}

#[test]
fn test_pager_command_parsing() {
    // 测试分页器命令解析
    let pager_command = "less -RF";
    let parts: Vec<&str> = pager_command.split_whitespace().collect();

    assert_eq!(parts[0], "less");
    assert_eq!(parts[1], "-RF");

    let pager_command = "more";
    let parts: Vec<&str> = pager_command.split_whitespace().collect();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0], "more");
}

#[test]
fn test_theme_names() {
    // 未知主题回退到默认主题,不会崩溃
    let theme = Theme::from_name("does-not-exist");
    let painted = (theme.title)("Dashboard");
    assert!(painted.contains("Dashboard"));

    for name in ["temp", "slate", "canvas", ""] {
        let theme = Theme::from_name(name);
        let painted = (theme.warn)("low stock");
        assert!(painted.contains("low stock"));
    }
}
