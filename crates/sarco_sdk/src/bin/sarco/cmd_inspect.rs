use super::*;

pub(crate) async fn exec(opt: OptInspect) -> SarcoResult<()> {
    let OptInspect {
        state_file,
        embalmer,
        recipient,
        id,
        now_ms,
    } = opt;

    let selector = match (embalmer, recipient) {
        (Some(address), _) => InspectSelector::Embalmer(address.into()),
        (None, Some(address)) => InspectSelector::Recipient(address.into()),
        (None, None) if !id.is_empty() => {
            InspectSelector::Ids(id.into_iter().map(SarcoId::from).collect())
        }
        (None, None) => InspectSelector::All,
    };

    let state = load_state_dump(&state_file).await?;
    let report = inspect(state, selector, now_ms).await?;

    let json =
        serde_json::to_string_pretty(&report).map_err(one_err::OneErr::new)?;
    println!("{json}");
    Ok(())
}
