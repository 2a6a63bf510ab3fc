//! DNS wire codec
//!
//! Translates between RFC 1035 wire bytes and the crate's `DnsMessage`
//! using `hickory-proto`. Only the sections the proxy inspects are mapped:
//! header flags, questions, answers and the response code.

use dnsgate_application::ports::DnsCodec;
use dnsgate_domain::{
    AnswerData, DnsAnswer, DnsMessage, DnsQuestion, DomainError, MessageFlags, ResponseCode,
};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode as WireResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

#[derive(Debug, Clone, Copy, Default)]
pub struct HickoryDnsCodec;

impl HickoryDnsCodec {
    pub fn new() -> Self {
        Self
    }

    fn name_to_string(name: &Name) -> String {
        let ascii = name.to_ascii();
        ascii.strip_suffix('.').unwrap_or(&ascii).to_string()
    }

    fn parse_name(name: &str) -> Result<Name, DomainError> {
        if name.is_empty() {
            return Ok(Name::root());
        }
        Name::from_ascii(name).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", name, e))
        })
    }

    fn to_record(answer: &DnsAnswer) -> Result<Record, DomainError> {
        let name = Self::parse_name(&answer.name)?;
        let rdata = match answer.data {
            AnswerData::A(address) => RData::A(A(address)),
            AnswerData::Other => {
                return Err(DomainError::EncodeFailed(format!(
                    "Cannot encode opaque record data for '{}'",
                    answer.name
                )))
            }
        };

        let mut record = Record::from_rdata(name, answer.ttl, rdata);
        record.set_dns_class(DNSClass::from(answer.class));
        Ok(record)
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::EncodeFailed(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}

impl DnsCodec for HickoryDnsCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DnsMessage, DomainError> {
        let message = Message::from_vec(bytes).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to parse DNS message: {}", e))
        })?;

        let flags = MessageFlags {
            response: message.message_type() == MessageType::Response,
            authoritative: message.authoritative(),
            truncated: message.truncated(),
            recursion_desired: message.recursion_desired(),
            recursion_available: message.recursion_available(),
        };

        let questions = message
            .queries()
            .iter()
            .map(|query| {
                DnsQuestion::new(
                    Self::name_to_string(query.name()),
                    u16::from(query.query_type()),
                    u16::from(query.query_class()),
                )
            })
            .collect();

        let answers = message
            .answers()
            .iter()
            .map(|record| DnsAnswer {
                name: Self::name_to_string(record.name()),
                record_type: u16::from(record.record_type()),
                class: u16::from(record.dns_class()),
                ttl: record.ttl(),
                data: match record.data() {
                    RData::A(a) => AnswerData::A(a.0),
                    _ => AnswerData::Other,
                },
            })
            .collect();

        Ok(DnsMessage {
            id: message.id(),
            flags,
            questions,
            answers,
            rcode: ResponseCode::from(u16::from(message.response_code())),
        })
    }

    fn encode(&self, message: &DnsMessage) -> Result<Vec<u8>, DomainError> {
        let message_type = if message.flags.response {
            MessageType::Response
        } else {
            MessageType::Query
        };
        let rcode: WireResponseCode = message.rcode.to_u16().into();

        let mut wire = Message::new();
        wire.set_id(message.id);
        wire.set_message_type(message_type);
        wire.set_op_code(OpCode::Query);
        wire.set_authoritative(message.flags.authoritative);
        wire.set_truncated(message.flags.truncated);
        wire.set_recursion_desired(message.flags.recursion_desired);
        wire.set_recursion_available(message.flags.recursion_available);
        wire.set_response_code(rcode);

        for question in &message.questions {
            let mut query = Query::new();
            query.set_name(Self::parse_name(&question.name)?);
            query.set_query_type(RecordType::from(question.qtype));
            query.set_query_class(DNSClass::from(question.qclass));
            wire.add_query(query);
        }

        for answer in &message.answers {
            wire.add_answer(Self::to_record(answer)?);
        }

        Self::serialize_message(&wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsgate_domain::{QCLASS_IN, QTYPE_A};
    use std::net::Ipv4Addr;

    fn raw_query(id: u16, labels: &[&str]) -> Vec<u8> {
        let mut bytes = id.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        for label in labels {
            bytes.push(label.len() as u8);
            bytes.extend_from_slice(label.as_bytes());
        }
        bytes.push(0);
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        bytes
    }

    #[test]
    fn test_decode_hand_built_query() {
        let codec = HickoryDnsCodec::new();
        let message = codec.decode(&raw_query(0x1234, &["example", "com"])).unwrap();

        assert_eq!(message.id, 0x1234);
        assert!(!message.flags.response);
        assert!(message.flags.recursion_desired);
        assert_eq!(message.questions.len(), 1);
        assert_eq!(message.questions[0].name, "example.com");
        assert_eq!(message.questions[0].qtype, QTYPE_A);
        assert_eq!(message.questions[0].qclass, QCLASS_IN);
        assert!(message.answers.is_empty());
    }

    #[test]
    fn test_decode_preserves_case() {
        let codec = HickoryDnsCodec::new();
        let message = codec.decode(&raw_query(1, &["DNSManager", "Test"])).unwrap();

        assert_eq!(message.questions[0].name, "DNSManager.Test");
    }

    #[test]
    fn test_decode_rejects_truncated_header() {
        let codec = HickoryDnsCodec::new();
        assert!(codec.decode(&[0x12, 0x34, 0x01]).is_err());
    }

    #[test]
    fn test_encode_admin_answer_wire_layout() {
        let codec = HickoryDnsCodec::new();
        let message = DnsMessage {
            id: 0xAABB,
            flags: MessageFlags::authoritative_response(),
            questions: vec![DnsQuestion::new("dnsmanager.test", QTYPE_A, QCLASS_IN)],
            answers: vec![DnsAnswer::a(
                "dnsmanager.test",
                300,
                Ipv4Addr::new(192, 168, 1, 83),
            )],
            rcode: ResponseCode::NoError,
        };

        let bytes = codec.encode(&message).unwrap();

        assert_eq!(&bytes[0..2], &[0xAA, 0xBB]);
        assert_eq!(bytes[2] & 0x80, 0x80, "QR should be set");
        assert_eq!(bytes[2] & 0x04, 0x04, "AA should be set");
        assert_eq!(bytes[3] & 0x0F, 0, "RCODE should be NOERROR");
        assert_eq!(&bytes[6..8], &[0x00, 0x01], "ANCOUNT should be 1");
        assert_eq!(&bytes[bytes.len() - 4..], &[192, 168, 1, 83]);

        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.answers[0].ttl, 300);
        assert_eq!(
            decoded.answers[0].data,
            AnswerData::A(Ipv4Addr::new(192, 168, 1, 83))
        );
    }

    #[test]
    fn test_encode_blocked_answer_header() {
        let codec = HickoryDnsCodec::new();
        let message = DnsMessage {
            id: 0x0102,
            flags: MessageFlags::authoritative_only(),
            questions: vec![DnsQuestion::new("blocked-example.com", QTYPE_A, QCLASS_IN)],
            answers: Vec::new(),
            rcode: ResponseCode::NxDomain,
        };

        let bytes = codec.encode(&message).unwrap();

        assert_eq!(&bytes[0..2], &[0x01, 0x02]);
        assert_eq!(bytes[2] & 0x80, 0, "QR should be clear");
        assert_eq!(bytes[2] & 0x04, 0x04, "AA should be set");
        assert_eq!(bytes[3] & 0x0F, 3, "RCODE should be NXDOMAIN");
        assert_eq!(&bytes[4..6], &[0x00, 0x01], "QDCOUNT should be 1");
        assert_eq!(&bytes[6..8], &[0x00, 0x00], "ANCOUNT should be 0");
    }

    #[test]
    fn test_encode_rejects_opaque_answer() {
        let codec = HickoryDnsCodec::new();
        let mut message = DnsMessage::query(1, DnsQuestion::new("a.com", QTYPE_A, QCLASS_IN));
        message.answers.push(DnsAnswer {
            name: "a.com".to_string(),
            record_type: 16,
            class: QCLASS_IN,
            ttl: 60,
            data: AnswerData::Other,
        });

        assert!(matches!(
            codec.encode(&message),
            Err(DomainError::EncodeFailed(_))
        ));
    }
}
