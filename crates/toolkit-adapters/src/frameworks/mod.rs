//! Supported Agent Frameworks

mod camel;
mod crewai;
mod langchain;
mod mcp;
mod openai;
mod strands;

pub use camel::CamelAdapter;
pub use crewai::CrewAiAdapter;
pub use langchain::LangChainAdapter;
pub use mcp::McpAdapter;
pub use openai::OpenAiAdapter;
pub use strands::StrandsAdapter;

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::FrameworkAdapter;
use crate::error::AdapterError;

/// Agent framework a tool set is presented to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    OpenAi,
    Strands,
    CrewAi,
    LangChain,
    Mcp,
    Camel,
}

impl Framework {
    pub const ALL: [Self; 6] = [
        Self::OpenAi,
        Self::Strands,
        Self::CrewAi,
        Self::LangChain,
        Self::Mcp,
        Self::Camel,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Strands => "strands",
            Self::CrewAi => "crewai",
            Self::LangChain => "langchain",
            Self::Mcp => "mcp",
            Self::Camel => "camel",
        }
    }

    /// The adapter implementing this framework's conventions
    pub fn adapter(self) -> Arc<dyn FrameworkAdapter> {
        match self {
            Self::OpenAi => Arc::new(OpenAiAdapter),
            Self::Strands => Arc::new(StrandsAdapter),
            Self::CrewAi => Arc::new(CrewAiAdapter),
            Self::LangChain => Arc::new(LangChainAdapter),
            Self::Mcp => Arc::new(McpAdapter),
            Self::Camel => Arc::new(CamelAdapter),
        }
    }
}

impl FromStr for Framework {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" | "openai-agents" | "openai_agents" => Ok(Self::OpenAi),
            "strands" => Ok(Self::Strands),
            "crewai" => Ok(Self::CrewAi),
            "langchain" => Ok(Self::LangChain),
            "mcp" => Ok(Self::Mcp),
            "camel" | "camel-ai" | "camel_ai" => Ok(Self::Camel),
            _ => Err(AdapterError::UnknownFramework(s.to_string())),
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_framework_names() {
        for framework in Framework::ALL {
            assert_eq!(framework.as_str().parse::<Framework>(), Ok(framework));
            assert_eq!(framework.adapter().framework(), framework);
        }
        assert_eq!("OpenAI".parse::<Framework>(), Ok(Framework::OpenAi));
        assert_eq!("camel-ai".parse::<Framework>(), Ok(Framework::Camel));
        assert_eq!(
            "autogen".parse::<Framework>(),
            Err(AdapterError::UnknownFramework("autogen".into()))
        );
    }
}
