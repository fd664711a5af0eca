use bacwire_core::apdu::{Apdu, ComplexAck, ConfirmedRequest, UnconfirmedRequest};
use bacwire_core::encoding::constructed::ConstructedData;
use bacwire_core::encoding::encode::Encode;
use bacwire_core::encoding::reader::Reader;
use bacwire_core::encoding::tag::{ApplicationTag, Tag};
use bacwire_core::encoding::value::TagValue;
use bacwire_core::npdu::{Npdu, RouteAddress};
use bacwire_core::services::{
    ConfirmedServiceRequest, IAmRequest, ReadPropertyAck, ReadPropertyRequest, ServiceAck,
    SubscribeCovRequest, TimeSynchronizationRequest, UnconfirmedServiceRequest, WhoHasRequest,
    WhoIsRequest, WritePropertyRequest,
};
use bacwire_core::types::{Date, ObjectId, ObjectType, PropertyId, Segmentation, Time};
use bacwire_core::DecodeError;

fn unconfirmed(service: UnconfirmedServiceRequest) -> Npdu {
    Npdu::new(Apdu::UnconfirmedRequest(UnconfirmedRequest::new(service)))
}

fn confirmed(invoke_id: u8, service: ConfirmedServiceRequest) -> Npdu {
    Npdu {
        expecting_reply: true,
        ..Npdu::new(Apdu::ConfirmedRequest(ConfirmedRequest::new(invoke_id, service)))
    }
}

fn assert_frame(npdu: &Npdu, expected: &[u8]) {
    assert_eq!(npdu.to_bytes().unwrap(), expected);
    assert_eq!(npdu.byte_len(), expected.len());
    assert_eq!(&Npdu::from_bytes(expected).unwrap(), npdu);
}

#[test]
fn who_is_global_frame_matches_fixture() {
    let npdu = unconfirmed(UnconfirmedServiceRequest::WhoIs(WhoIsRequest::global()));
    assert_frame(&npdu, &[0x01, 0x00, 0x10, 0x08]);
}

#[test]
fn who_is_routed_to_global_broadcast() {
    let npdu = unconfirmed(UnconfirmedServiceRequest::WhoIs(WhoIsRequest::range(1, 10)))
        .routed_to(RouteAddress::broadcast(0xFFFF));
    assert_frame(
        &npdu,
        &[0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF, 0x10, 0x08, 0x09, 0x01, 0x19, 0x0A],
    );
}

#[test]
fn i_am_frame_matches_fixture() {
    let npdu = unconfirmed(UnconfirmedServiceRequest::IAm(IAmRequest::new(
        ObjectId::new(ObjectType::Device, 123),
        1476,
        Segmentation::NoSegmentation,
        15,
    )));
    assert_frame(
        &npdu,
        &[
            0x01, 0x00, 0x10, 0x00, 0xC4, 0x02, 0x00, 0x00, 0x7B, 0x22, 0x05, 0xC4, 0x91, 0x03,
            0x21, 0x0F,
        ],
    );
}

#[test]
fn read_property_frame_matches_fixture() {
    let npdu = confirmed(
        1,
        ConfirmedServiceRequest::ReadProperty(ReadPropertyRequest::new(
            ObjectId::new(ObjectType::Device, 123),
            PropertyId::ObjectName,
            None,
        )),
    );
    assert_frame(
        &npdu,
        &[
            0x01, 0x04, 0x02, 0x05, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D,
        ],
    );
}

#[test]
fn read_property_ack_frame_matches_fixture() {
    let ack = ReadPropertyAck::new(
        ObjectId::new(ObjectType::Device, 123),
        PropertyId::ObjectName,
        None,
        ConstructedData::with_tags(
            3,
            [Tag::Application(ApplicationTag::character_string("AHU"))],
        ),
    );
    let npdu = Npdu::new(Apdu::ComplexAck(ComplexAck::new(
        1,
        ServiceAck::ReadProperty(ack),
    )));
    assert_frame(
        &npdu,
        &[
            0x01, 0x00, 0x30, 0x01, 0x0C, 0x0C, 0x02, 0x00, 0x00, 0x7B, 0x19, 0x4D, 0x3E, 0x74,
            0x00, b'A', b'H', b'U', 0x3F,
        ],
    );
}

#[test]
fn write_property_frame_matches_fixture() {
    let value = ApplicationTag::new(TagValue::Real(72.5)).unwrap();
    let npdu = confirmed(
        2,
        ConfirmedServiceRequest::WriteProperty(WritePropertyRequest::new(
            ObjectId::new(ObjectType::AnalogValue, 1),
            PropertyId::PresentValue,
            None,
            Tag::Application(value),
            Some(8),
        )),
    );
    assert_frame(
        &npdu,
        &[
            0x01, 0x04, 0x02, 0x05, 0x02, 0x0F, 0x0C, 0x00, 0x80, 0x00, 0x01, 0x19, 0x55, 0x3E,
            0x44, 0x42, 0x91, 0x00, 0x00, 0x3F, 0x49, 0x08,
        ],
    );
}

#[test]
fn subscribe_cov_frame_matches_fixture() {
    let npdu = confirmed(
        3,
        ConfirmedServiceRequest::SubscribeCov(SubscribeCovRequest::subscribe(
            17,
            ObjectId::new(ObjectType::AnalogInput, 0),
            false,
            300,
        )),
    );
    assert_frame(
        &npdu,
        &[
            0x01, 0x04, 0x02, 0x05, 0x03, 0x05, 0x09, 0x11, 0x1C, 0x00, 0x00, 0x00, 0x00, 0x29,
            0x00, 0x3A, 0x01, 0x2C,
        ],
    );
}

#[test]
fn who_has_by_name_frame_matches_fixture() {
    let npdu = unconfirmed(UnconfirmedServiceRequest::WhoHas(WhoHasRequest::by_name(
        "Zone",
    )));
    assert_frame(
        &npdu,
        &[0x01, 0x00, 0x10, 0x07, 0x3D, 0x05, 0x00, b'Z', b'o', b'n', b'e'],
    );
}

#[test]
fn time_synchronization_frame_matches_fixture() {
    let npdu = unconfirmed(UnconfirmedServiceRequest::TimeSynchronization(
        TimeSynchronizationRequest::new(
            Date::from_octets([124, 2, 29, 4]),
            Time::from_octets([13, 45, 30, 0]),
        ),
    ));
    assert_frame(
        &npdu,
        &[
            0x01, 0x00, 0x10, 0x06, 0xA4, 124, 2, 29, 4, 0xB4, 13, 45, 30, 0,
        ],
    );
}

#[test]
fn extended_tag_number_survives_reencoding() {
    let bytes = [0xF9, 0xC8, 0x05];
    let tag = Tag::from_bytes(&bytes).unwrap();
    assert_eq!(tag.tag_number(), 200);
    assert_eq!(tag.header().tag_number_or_type, 15);
    assert_eq!(tag.to_bytes().unwrap(), bytes);
}

#[test]
fn misnumbered_closing_tag_ends_in_truncation() {
    let bytes = [0x3E, 0x21, 0x01, 0x4F, 0x21, 0x02];
    let mut r = Reader::new(&bytes);
    assert_eq!(
        ConstructedData::decode(&mut r, 3).unwrap_err(),
        DecodeError::UnexpectedEof
    );
}
