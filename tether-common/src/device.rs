use std::{fmt::Display, str::FromStr};

/// Placement of a tensor's data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub enum Device {
    #[default]
    Cpu,
    /// Apple GPU accelerator with the given index.
    Mps(u8),
}

impl Device {
    #[inline]
    pub fn is_cpu(&self) -> bool {
        matches!(self, Self::Cpu)
    }

    /// Device type code used across the C ABI.
    pub fn type_code(&self) -> i32 {
        match self {
            Self::Cpu => 0,
            Self::Mps(_) => 13,
        }
    }

    pub fn index(&self) -> Option<u8> {
        match self {
            Self::Cpu => None,
            Self::Mps(i) => Some(*i),
        }
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            Self::Mps(i) => write!(f, "mps:{}", i),
        }
    }
}

impl FromStr for Device {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || crate::Error::Parse(format!("device {:?}", s));
        let mut parts = s.splitn(2, ':');
        match (parts.next(), parts.next()) {
            (Some("cpu"), None) => Ok(Self::Cpu),
            (Some("mps"), None) => Ok(Self::Mps(0)),
            (Some("mps"), Some(index)) => index.parse().map(Self::Mps).map_err(|_| err()),
            _ => Err(err()),
        }
    }
}

impl From<Device> for String {
    fn from(value: Device) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Device {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod test {
    use super::Device;

    #[test]
    fn test_parse() {
        assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
        assert_eq!("mps".parse::<Device>().unwrap(), Device::Mps(0));
        assert_eq!("mps:2".parse::<Device>().unwrap(), Device::Mps(2));
        assert!("cuda:0".parse::<Device>().is_err());
        assert!("mps:x".parse::<Device>().is_err());
        assert_eq!(Device::Mps(1).to_string(), "mps:1");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&vec![Device::Cpu, Device::Mps(0)]).unwrap();
        assert_eq!(json, r#"["cpu","mps:0"]"#);
        let devices: Vec<Device> = serde_json::from_str(&json).unwrap();
        assert_eq!(devices, vec![Device::Cpu, Device::Mps(0)]);
    }
}
