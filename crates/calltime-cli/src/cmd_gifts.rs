use calltime_core::gifts::{
    format_price, GiftId, GiftSelection, SendGiftRequest, GIFT_OPTIONS,
};
use calltime_store::StorePaths;
use clap::Subcommand;

use crate::TargetArgs;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum GiftsCmd {
    /// List the gift tiers
    Catalog,
    /// Send gifts to collaborators
    Send {
        #[command(flatten)]
        target: TargetArgs,
        /// Recipient and tier, e.g. "Sarah Chen=hat" (repeatable)
        #[arg(long = "to", value_name = "NAME=GIFT")]
        to: Vec<String>,
        /// Send the same tier to every top collaborator
        #[arg(long, value_name = "GIFT", conflicts_with = "to")]
        all: Option<String>,
        /// Optional note attached to every gift
        #[arg(long)]
        message: Option<String>,
    },
    /// Show gifts already sent
    History {
        #[command(flatten)]
        target: TargetArgs,
    },
}

// ── Dispatch ──

pub fn run(cmd: GiftsCmd, paths: &StorePaths) -> anyhow::Result<()> {
    match cmd {
        GiftsCmd::Catalog => {
            catalog();
            Ok(())
        }
        GiftsCmd::Send {
            target,
            to,
            all,
            message,
        } => send(paths, &target, &to, all.as_deref(), message),
        GiftsCmd::History { target } => history(paths, &target),
    }
}

// ── Command Implementations ──

fn parse_gift(s: &str) -> anyhow::Result<GiftId> {
    GiftId::parse(s.trim()).ok_or_else(|| {
        let known: Vec<&str> = GiftId::ALL.iter().map(|g| g.as_str()).collect();
        anyhow::anyhow!("unknown gift '{s}' (expected one of: {})", known.join(", "))
    })
}

/// Parse repeated `NAME=GIFT` pairs. A later pair for the same name replaces the earlier one.
fn parse_assignments(pairs: &[String]) -> anyhow::Result<GiftSelection> {
    let mut selection = GiftSelection::new();
    for pair in pairs {
        let (name, gift) = pair
            .rsplit_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected NAME=GIFT, got '{pair}'"))?;
        let name = name.trim();
        if name.is_empty() {
            anyhow::bail!("missing collaborator name in '{pair}'");
        }
        selection = selection.with(name, parse_gift(gift)?);
    }
    Ok(selection)
}

/// `calltime gifts catalog`
pub fn catalog() {
    for option in &GIFT_OPTIONS {
        println!(
            "{:<10} {:<24} {:>8}  {}",
            option.id.as_str(),
            option.name,
            option.price_label,
            option.description
        );
    }
}

/// `calltime gifts send --to NAME=GIFT ...`
pub fn send(
    paths: &StorePaths,
    target: &TargetArgs,
    to: &[String],
    all: Option<&str>,
    message: Option<String>,
) -> anyhow::Result<()> {
    let config = target.resolve(paths)?;
    let rt = tokio::runtime::Runtime::new()?;

    let selection = match all {
        Some(gift) => {
            let gift = parse_gift(gift)?;
            let source = calltime_client::recap_source(&config)?;
            let snapshot = rt.block_on(source.fetch(&config.user_id, config.year))?;
            GiftSelection::all(snapshot.top_collaborators(), gift)
        }
        None => parse_assignments(to)?,
    };

    let recipients = selection.to_request_items()?;
    let request = SendGiftRequest {
        sender_user_id: config.user_id.clone(),
        recipients,
        year: config.year,
        message,
    };
    let sender = calltime_client::gift_sender(&config)?;
    let sent = rt.block_on(sender.send(request))?.into_result()?;
    tracing::info!(sent, "gifts sent");
    println!(
        "Sent {sent} gift{} (total {})",
        if sent == 1 { "" } else { "s" },
        format_price(selection.total_cost())
    );
    Ok(())
}

/// `calltime gifts history`
pub fn history(paths: &StorePaths, target: &TargetArgs) -> anyhow::Result<()> {
    let config = target.resolve(paths)?;
    let sender = calltime_client::gift_sender(&config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let entries = rt.block_on(sender.history(&config.user_id, config.year))?;
    if entries.is_empty() {
        println!("(no gifts sent for {})", config.year);
        return Ok(());
    }
    for entry in &entries {
        let claimed = if entry.claimed { "claimed" } else { "pending" };
        println!(
            "{}  {:<24} {:<10} {claimed}",
            entry.sent_at,
            entry.collaborator_name,
            entry.gift_option_id.as_str()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_parse_names_with_spaces() {
        let sel = parse_assignments(&["Sarah Chen=hat".into(), "Alex Kim = wrap-box".into()])
            .unwrap();
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.get("Sarah Chen"), Some(GiftId::Hat));
        assert_eq!(sel.get("Alex Kim"), Some(GiftId::WrapBox));
    }

    #[test]
    fn later_assignment_replaces_earlier() {
        let sel = parse_assignments(&["Sarah Chen=hat".into(), "Sarah Chen=free".into()]).unwrap();
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.get("Sarah Chen"), Some(GiftId::Free));
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        assert!(parse_assignments(&["Sarah Chen".into()]).is_err());
        assert!(parse_assignments(&["=hat".into()]).is_err());
        assert!(parse_assignments(&["Sarah Chen=yacht".into()]).is_err());
    }

    #[test]
    fn send_with_no_recipients_fails_validation() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = StorePaths::at(tmp.path());
        let err = send(&paths, &TargetArgs::default(), &[], None, None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<calltime_core::RecapError>(),
            Some(&calltime_core::RecapError::Validation)
        );
    }
}
