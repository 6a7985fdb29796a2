//! External signals that interrupt a running mode

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interruption {
    /// A call went off-hook
    PhoneCall,
    ScreenOff,
    ScreenOn,
}

impl Interruption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interruption::PhoneCall => "phone-call",
            Interruption::ScreenOff => "screen-off",
            Interruption::ScreenOn => "screen-on",
        }
    }
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interruption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phone-call" => Ok(Interruption::PhoneCall),
            "screen-off" => Ok(Interruption::ScreenOff),
            "screen-on" => Ok(Interruption::ScreenOn),
            other => Err(format!("Unknown interruption: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_case_names() {
        for kind in [Interruption::PhoneCall, Interruption::ScreenOff, Interruption::ScreenOn] {
            assert_eq!(kind.as_str().parse::<Interruption>(), Ok(kind));
        }
        assert!("doorbell".parse::<Interruption>().is_err());
    }
}
