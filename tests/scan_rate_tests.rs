//! 扫码频率提醒功能测试

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[test]
fn test_rate_calculation() {
    // 测试频率计算逻辑
    let mut history = VecDeque::new();
    let now = Instant::now();

    // 添加30次扫码（1分钟内）
    for i in 0..30 {
        history.push_back(now - Duration::from_secs(i));
    }

    // 应该触发频率提醒
    assert!(history.len() >= 30);
}

#[test]
fn test_rate_window_cleanup() {
    // 测试清理过期扫码记录
    let mut history = VecDeque::new();
    let now = Instant::now();

    // 添加一些旧的扫码（超过1分钟）
    history.push_back(now - Duration::from_secs(120));
    history.push_back(now - Duration::from_secs(90));

    // 添加一些新的扫码（1分钟内）
    history.push_back(now - Duration::from_secs(30));
    history.push_back(now - Duration::from_secs(10));

    // 清理超过1分钟的扫码
    history.retain(|&time| now.duration_since(time) < Duration::from_secs(60));

    // 应该只剩下2次扫码
    assert_eq!(history.len(), 2);
}

#[test]
fn test_rate_threshold() {
    // 测试频率阈值
    let threshold = 30;
    let mut history = VecDeque::new();
    let now = Instant::now();

    // 添加29次扫码（未达到阈值）
    for i in 0..29 {
        history.push_back(now - Duration::from_secs(i));
    }
    assert!(history.len() < threshold);

    // 添加1次扫码（达到阈值）
    history.push_back(now);
    assert!(history.len() >= threshold);
}
