use std::fmt;
use std::net::Ipv4Addr;

pub const QTYPE_A: u16 = 1;
pub const QCLASS_IN: u16 = 1;

/// Header bits the proxy reads or synthesizes. Opcode and Z are not modelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageFlags {
    pub response: bool,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
}

impl MessageFlags {
    pub fn authoritative_response() -> Self {
        Self {
            response: true,
            authoritative: true,
            ..Self::default()
        }
    }

    /// AA without QR, the header shape of a blocked answer.
    pub fn authoritative_only() -> Self {
        Self {
            authoritative: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u16),
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Other(_) => "OTHER",
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NxDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(code) => code,
        }
    }
}

impl From<u16> for ResponseCode {
    fn from(code: u16) -> Self {
        match code {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NxDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Other(code) => write!(f, "RCODE{}", code),
            known => f.write_str(known.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    /// Name as received, without the trailing root dot.
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl DnsQuestion {
    pub fn new(name: impl Into<String>, qtype: u16, qclass: u16) -> Self {
        Self {
            name: name.into(),
            qtype,
            qclass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerData {
    A(Ipv4Addr),
    /// Any record data the proxy never synthesizes. Decoded for inspection only.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    pub name: String,
    pub record_type: u16,
    pub class: u16,
    pub ttl: u32,
    pub data: AnswerData,
}

impl DnsAnswer {
    pub fn a(name: impl Into<String>, ttl: u32, address: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            record_type: QTYPE_A,
            class: QCLASS_IN,
            ttl,
            data: AnswerData::A(address),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsMessage {
    pub id: u16,
    pub flags: MessageFlags,
    pub questions: Vec<DnsQuestion>,
    pub answers: Vec<DnsAnswer>,
    pub rcode: ResponseCode,
}

impl DnsMessage {
    pub fn query(id: u16, question: DnsQuestion) -> Self {
        Self {
            id,
            flags: MessageFlags {
                recursion_desired: true,
                ..MessageFlags::default()
            },
            questions: vec![question],
            answers: Vec::new(),
            rcode: ResponseCode::NoError,
        }
    }

    pub fn first_question(&self) -> Option<&DnsQuestion> {
        self.questions.first()
    }
}
