use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use clap::Parser;
use correlator::{CorrelatorEvent, TransitionCorrelator, TransitionHost};
use serde::Serialize;
use shared::domain::{Destination, ScreenInfo, TransitionContext, TransitionId};
use tokio::sync::mpsc;
use tracing::{info, warn};

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario to run: detail, roster, or forgotten.
    #[arg(long, default_value = "detail")]
    scenario: String,
    /// Watchdog interval override in milliseconds.
    #[arg(long)]
    watchdog_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DetailScreen {
    item: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RosterScreen;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AppScreen {
    Detail(DetailScreen),
    Roster(RosterScreen),
}

impl ScreenInfo for AppScreen {
    fn screen_name(&self) -> &'static str {
        match self {
            Self::Detail(_) => "DetailScreen",
            Self::Roster(_) => "RosterScreen",
        }
    }
}

impl TryFrom<AppScreen> for DetailScreen {
    type Error = AppScreen;

    fn try_from(screen: AppScreen) -> Result<Self, AppScreen> {
        match screen {
            AppScreen::Detail(detail) => Ok(detail),
            other => Err(other),
        }
    }
}

/// Stand-in for the real navigation framework: resolves identifiers through
/// a routing table and delivers the prepare hook on a later runtime turn,
/// unless configured to "forget" it.
struct SimulatedStoryboard {
    routes: HashMap<TransitionId, Destination<AppScreen>>,
    hook_tx: mpsc::UnboundedSender<TransitionContext<AppScreen>>,
    hook_delay: Duration,
    deliver_hook: bool,
}

#[async_trait]
impl TransitionHost for SimulatedStoryboard {
    async fn begin_transition(&self, identifier: &TransitionId) -> Result<()> {
        let destination = self
            .routes
            .get(identifier)
            .cloned()
            .ok_or_else(|| anyhow!("no route for transition '{identifier}'"))?;

        if !self.deliver_hook {
            warn!(identifier = %identifier, "storyboard is configured to drop its prepare hook");
            return Ok(());
        }

        let tx = self.hook_tx.clone();
        let context = TransitionContext::new(identifier.clone(), destination);
        let delay = self.hook_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(context);
        });
        Ok(())
    }
}

fn routes() -> HashMap<TransitionId, Destination<AppScreen>> {
    let mut routes = HashMap::new();
    routes.insert(
        TransitionId::from("showDetail"),
        Destination::Tabs(vec![Destination::Navigation(vec![
            Destination::Screen(AppScreen::Roster(RosterScreen)),
            Destination::Screen(AppScreen::Detail(DetailScreen {
                item: "item-42".to_string(),
            })),
        ])]),
    );
    routes.insert(
        TransitionId::from("showRoster"),
        Destination::Screen(AppScreen::Roster(RosterScreen)),
    );
    routes
}

#[derive(Debug, Serialize)]
struct RunReport {
    scenario: String,
    watchdog_ms: u64,
    events: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();
    let settings = load_settings();

    let watchdog_ms = args.watchdog_ms.unwrap_or(settings.watchdog_ms);
    let deliver_hook = args.scenario != "forgotten";

    let (hook_tx, mut hook_rx) = mpsc::unbounded_channel();
    let host = Arc::new(SimulatedStoryboard {
        routes: routes(),
        hook_tx,
        hook_delay: Duration::from_millis(settings.hook_delay_ms),
        deliver_hook,
    });
    let correlator: TransitionCorrelator<AppScreen> =
        TransitionCorrelator::with_watchdog(host, Duration::from_millis(watchdog_ms));
    let mut events = correlator.subscribe_events();

    let driver = {
        let correlator = correlator.clone();
        tokio::spawn(async move {
            while let Some(context) = hook_rx.recv().await {
                correlator.notify_prepared(context).await;
            }
        })
    };

    match args.scenario.as_str() {
        "detail" => {
            correlator
                .request_transition_expecting("showDetail", |screen: DetailScreen| {
                    info!(item = %screen.item, "detail screen prepared");
                })
                .await;
        }
        "roster" => {
            correlator.request_transition("showRoster").await;
        }
        "forgotten" => {
            correlator.request_transition("showDetail").await;
        }
        other => bail!("unknown scenario '{other}' (expected detail, roster, or forgotten)"),
    }

    let mut report = RunReport {
        scenario: args.scenario,
        watchdog_ms,
        events: Vec::new(),
    };
    while let Ok(Ok(event)) =
        tokio::time::timeout(Duration::from_millis(watchdog_ms * 4 + 100), events.recv()).await
    {
        match event {
            CorrelatorEvent::Prepared { identifier } => {
                report.events.push(format!("prepared:{identifier}"));
                break;
            }
            CorrelatorEvent::HandlerReplaced { identifier } => {
                report.events.push(format!("handler_replaced:{identifier}"));
            }
            CorrelatorEvent::Fault(fault) => {
                report.events.push(format!("fault:{fault}"));
                break;
            }
        }
    }

    driver.abort();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
