use battle::error::{Context, Error, ErrorKind, LoadError, Result};

// clear; cargo fmt; cargo test -- --nocapture
#[test]
fn show_error_messages() {
    let load_err = LoadError::InvalidSnapshot {
        reason: "currentLevel 必須 >= 1".to_string(),
    };
    let err: Error = load_err.into();
    let err = err
        .context("讀取存檔")
        .context("處理讀檔事件")
        .context("回合引擎");

    let error_str = err.to_string();
    println!("{error_str}");

    // 驗證原始錯誤訊息
    assert!(error_str.contains("currentLevel 必須 >= 1"));

    // 驗證 contexts 依序出現且帶有呼叫位置
    let lines: Vec<&str> = error_str.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].contains("讀取存檔 ["));
    assert!(lines[1].contains("test_error.rs:11]"));
    assert!(lines[2].contains("處理讀檔事件 ["));
    assert!(lines[2].contains("test_error.rs:12]"));
    assert!(lines[3].contains("回合引擎 ["));
    assert!(lines[3].contains("test_error.rs:13]"));
}

#[test]
fn result_context_keeps_kind() {
    fn load() -> Result<()> {
        Err(LoadError::SnapshotMissing.into())
    }

    let err = load().context("讀檔").unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::Load(LoadError::SnapshotMissing)
    ));
    assert!(err.to_string().starts_with("找不到存檔"));
    assert!(err.to_string().contains("test_error.rs:38]"));
}
