
pub(crate) mod fixtures {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use shared::domain::{Destination, ScreenInfo, TransitionId};
    use tokio::sync::Mutex;

    use crate::TransitionHost;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DetailScreen {
        pub item: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SettingsScreen;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TestScreen {
        Detail(DetailScreen),
        Settings(SettingsScreen),
    }

    impl ScreenInfo for TestScreen {
        fn screen_name(&self) -> &'static str {
            match self {
                Self::Detail(_) => "DetailScreen",
                Self::Settings(_) => "SettingsScreen",
            }
        }
    }

    impl TryFrom<TestScreen> for DetailScreen {
        type Error = TestScreen;

        fn try_from(screen: TestScreen) -> Result<Self, TestScreen> {
            match screen {
                TestScreen::Detail(detail) => Ok(detail),
                other => Err(other),
            }
        }
    }

    impl TryFrom<TestScreen> for SettingsScreen {
        type Error = TestScreen;

        fn try_from(screen: TestScreen) -> Result<Self, TestScreen> {
            match screen {
                TestScreen::Settings(settings) => Ok(settings),
                other => Err(other),
            }
        }
    }

    pub fn detail(item: &str) -> Destination<TestScreen> {
        Destination::Screen(TestScreen::Detail(DetailScreen {
            item: item.to_string(),
        }))
    }

    pub fn settings() -> Destination<TestScreen> {
        Destination::Screen(TestScreen::Settings(SettingsScreen))
    }

    pub struct RecordingHost {
        pub begun: Mutex<Vec<TransitionId>>,
    }

    impl RecordingHost {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                begun: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TransitionHost for RecordingHost {
        async fn begin_transition(&self, identifier: &TransitionId) -> Result<()> {
            self.begun.lock().await.push(identifier.clone());
            Ok(())
        }
    }

    pub struct FailingHost;

    #[async_trait]
    impl TransitionHost for FailingHost {
        async fn begin_transition(&self, identifier: &TransitionId) -> Result<()> {
            Err(anyhow!("storyboard rejected transition '{identifier}'"))
        }
    }
}
