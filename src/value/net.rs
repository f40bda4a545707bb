use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use super::{hex, Primitive};
use crate::ValueError;

macro_rules! ip_primitive {
    ($($ty:ty),*) => {$(
        impl Primitive for $ty {
            const TYPE_NAME: &'static str = "ip";

            fn parse(s: &str) -> Result<Self, ValueError> {
                s.trim().parse().map_err(|source| ValueError::Ip { input: s.to_string(), source })
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    )*};
}
ip_primitive![IpAddr, Ipv4Addr, Ipv6Addr];

/// An IP network in CIDR notation. The address is always masked down to
/// the network prefix, `10.1.2.3/8` becomes `10.0.0.0/8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    addr: IpAddr,
    prefix: u8,
}

impl IpNet {
    pub fn new(addr: IpAddr, prefix: u8) -> Option<IpNet> {
        let bits = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix > bits {
            return None;
        }
        let addr = match addr {
            IpAddr::V4(a) => {
                let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(u32::from(a) & mask))
            }
            IpAddr::V6(a) => {
                let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
                IpAddr::V6(Ipv6Addr::from(u128::from(a) & mask))
            }
        };
        Some(IpNet { addr, prefix })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        IpNet::new(ip, self.prefix).is_some_and(|net| net == *self)
    }
}

impl Default for IpNet {
    fn default() -> IpNet {
        IpNet { addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), prefix: 0 }
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl FromStr for IpNet {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<IpNet, ValueError> {
        let err = || ValueError::IpNet(s.to_string());
        let (addr, prefix) = s.trim().split_once('/').ok_or_else(err)?;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let addr: IpAddr = addr.parse().map_err(|_| err())?;
        let prefix: u8 = prefix.parse().map_err(|_| err())?;
        IpNet::new(addr, prefix).ok_or_else(err)
    }
}

impl Primitive for IpNet {
    const TYPE_NAME: &'static str = "ipNet";

    fn parse(s: &str) -> Result<IpNet, ValueError> {
        s.parse()
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

/// An IPv4 netmask, written either dotted (`255.255.255.0`) or as eight hex
/// digits (`ffffff00`). Rendered as hex.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpMask(pub [u8; 4]);

impl IpMask {
    /// Number of leading one bits, if the mask is canonical.
    pub fn prefix_len(&self) -> Option<u32> {
        let bits = u32::from_be_bytes(self.0);
        let ones = bits.leading_ones();
        (bits.checked_shl(ones).unwrap_or(0) == 0).then_some(ones)
    }
}

impl fmt::Display for IpMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl FromStr for IpMask {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<IpMask, ValueError> {
        let err = || ValueError::IpMask(s.to_string());
        if let Ok(dotted) = s.parse::<Ipv4Addr>() {
            return Ok(IpMask(dotted.octets()));
        }
        let digits = s.trim();
        if digits.len() != 8 || digits.starts_with("0x") || digits.starts_with("0X") {
            return Err(err());
        }
        let bytes = hex::decode(digits).map_err(|_| err())?;
        let octets = <[u8; 4]>::try_from(bytes.as_slice()).map_err(|_| err())?;
        Ok(IpMask(octets))
    }
}

impl Primitive for IpMask {
    const TYPE_NAME: &'static str = "ipMask";

    fn parse(s: &str) -> Result<IpMask, ValueError> {
        s.parse()
    }

    fn render(&self) -> String {
        self.to_string()
    }
}
