use serde::{Deserialize, Serialize};

use crate::host::HostEvent;

/// Commands sent by the control panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelCommand {
    TriggerTypewriter {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speed: Option<u64>,
    },
    HandlePaste {
        text: String,
    },
    SelectTab {
        #[serde(rename = "tabName")]
        tab_name: String,
    },
    ToggleAutoTrigger {
        value: bool,
    },
    SetTypingSpeed {
        value: u64,
    },
    ToggleArrowVisibility {
        #[serde(rename = "isVisible")]
        is_visible: bool,
    },
    HandleClear,
    RequestTabs,
}

/// Messages sent back to the control panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelMessage {
    ClearText,
    Info { message: String },
    TabList { tabs: Vec<String> },
}

/// Everything the session controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Panel(PanelCommand),
    Host(HostEvent),
}

impl From<PanelCommand> for SessionEvent {
    fn from(command: PanelCommand) -> Self {
        SessionEvent::Panel(command)
    }
}

impl From<HostEvent> for SessionEvent {
    fn from(event: HostEvent) -> Self {
        SessionEvent::Host(event)
    }
}
