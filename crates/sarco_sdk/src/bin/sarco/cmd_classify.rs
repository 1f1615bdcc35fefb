use super::*;

fn local_now_ms() -> SarcoResult<i64> {
    let elapsed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(one_err::OneErr::new)?;
    i64::try_from(elapsed.as_millis()).map_err(one_err::OneErr::new)
}

pub(crate) async fn exec(opt: OptClassify) -> SarcoResult<()> {
    let grace_period = GracePeriod::new(opt.grace_period)?;
    let now_ms = match opt.now_ms {
        Some(now_ms) => now_ms,
        None => local_now_ms()?,
    };

    let snapshot = SarcophagusSnapshot {
        resurrection_time: opt.resurrection_time,
        is_compromised: opt.compromised,
        is_buried: opt.buried,
        ..Default::default()
    };

    let state = classify(&snapshot, grace_period, now_ms);
    tracing::debug!(?snapshot, grace_period = grace_period.as_secs(), now_ms, %state);

    println!("{state}");
    Ok(())
}
