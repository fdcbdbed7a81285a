//! # Maneuver Codec Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use comms_if::imc::{Header, Message};
use mnvr_lib::{
    loc::Location,
    mnvr::{CoverArea, CoverAreaParams, LocatedManeuver, Maneuver, PolygonManeuver},
    xml::XmlElement,
};

fn codec_benchmark(c: &mut Criterion) {
    // ---- Build a survey polygon ----

    let mut ca = CoverArea::new();
    ca.set_anchor(Location::from_degrees(41.18, -8.70));
    for i in 0..50 {
        let theta = (i as f64) * std::f64::consts::TAU / 50.0;
        ca.add_vertex(&Location::from_degrees(41.18, -8.70).translated(
            500.0 * theta.cos(),
            500.0 * theta.sin(),
            0.0,
        ));
    }

    let xml = ca.to_xml("CoverArea").to_xml_string().unwrap();
    let bytes = ca.to_msg().to_bytes(&Header::default()).unwrap();

    // ---- XML ----

    c.bench_function("CoverArea::to_xml", |b| {
        b.iter(|| ca.to_xml("CoverArea").to_xml_string().unwrap())
    });

    c.bench_function("CoverArea::from_xml", |b| {
        b.iter(|| CoverArea::from_xml(&xml).unwrap())
    });

    c.bench_function("XmlElement::parse", |b| {
        b.iter(|| XmlElement::parse(&xml).unwrap())
    });

    // ---- Binary ----

    c.bench_function("CoverArea::to_msg", |b| {
        b.iter(|| ca.to_msg().to_bytes(&Header::default()).unwrap())
    });

    let params = CoverAreaParams::default();
    c.bench_function("CoverArea::from_msg", |b| {
        b.iter(|| {
            let (_, msg) = Message::from_bytes(&bytes).unwrap();
            CoverArea::from_msg(&msg, &params).unwrap()
        })
    });

    // ---- Editing ----

    c.bench_function("CoverArea::translate", |b| {
        b.iter(|| ca.translate(1.0, -1.0, 0.0))
    });
}

criterion_group!(benches, codec_benchmark);
criterion_main!(benches);
