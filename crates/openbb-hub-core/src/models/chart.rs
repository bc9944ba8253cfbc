use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque handle to a rendered figure. Never serialized.
pub type Figure = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    #[default]
    Plotly,
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartFormat::Plotly => write!(f, "plotly"),
        }
    }
}

fn default_format() -> Option<ChartFormat> {
    Some(ChartFormat::Plotly)
}

/// Chart attached to a command result: raw content plus the format it is in.
#[derive(Clone, Serialize, Deserialize)]
pub struct Chart {
    /// Raw textual representation of the chart
    #[serde(default)]
    pub content: Option<Map<String, Value>>,
    #[serde(default = "default_format")]
    pub format: Option<ChartFormat>,
    #[serde(skip)]
    pub fig: Option<Figure>,
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            content: None,
            format: default_format(),
            fig: None,
        }
    }
}

impl Chart {
    pub fn new(content: Map<String, Value>) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn with_figure(mut self, fig: Figure) -> Self {
        self.fig = Some(fig);
        self
    }

    /// Borrow the figure as its concrete type, if it is one
    pub fn figure<T: Any>(&self) -> Option<&T> {
        self.fig.as_ref().and_then(|f| f.downcast_ref::<T>())
    }
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("content", &self.content)
            .field("format", &self.format)
            .field("fig", &self.fig.as_ref().map(|_| "<figure>"))
            .finish()
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = match self.content {
            Some(ref c) => Value::Object(c.clone()).to_string(),
            None => "None".to_string(),
        };
        let format = match self.format {
            Some(format) => format.to_string(),
            None => "None".to_string(),
        };
        let fig = if self.fig.is_some() { "<figure>" } else { "None" };

        write!(f, "Chart\n\ncontent: {}\nformat: {}\nfig: {}", content, format, fig)
    }
}
