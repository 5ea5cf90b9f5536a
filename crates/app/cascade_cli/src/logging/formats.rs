use flexi_logger::DeferredNow;
use log::Record;

/// `2026-10-17 09:41:07.123 WARN  [cascade_core::editor] message`
pub fn cli_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {:<5} [{}] {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("<unnamed>"),
        record.args()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_carries_level_module_and_message() {
        let mut out = Vec::new();
        let mut now = DeferredNow::new();

        cli_format(
            &mut out,
            &mut now,
            &Record::builder()
                .args(format_args!("systems loaded"))
                .level(log::Level::Info)
                .module_path(Some("cascade_core::editor"))
                .build(),
        )
        .unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with("INFO  [cascade_core::editor] systems loaded"));
    }
}
