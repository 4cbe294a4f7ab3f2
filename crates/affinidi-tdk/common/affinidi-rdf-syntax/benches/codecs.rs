use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;

use affinidi_rdf_syntax::model::*;
use affinidi_rdf_syntax::{PrefixTable, nquads, turtle};

const CREDENTIAL_TTL: &str = "\
@prefix cred: <https://www.w3.org/2018/credentials#> .
@prefix schema: <https://schema.org/> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix sec: <https://w3id.org/security#> .

<urn:uuid:58172aac-d8ba-11ed-83dd-0b3aef56cc33> a cred:VerifiableCredential ;
    schema:name \"Alumni Credential\" ;
    schema:description \"A minimum viable example of an Alumni Credential.\" ;
    cred:issuer <https://vc.example/issuers/5678> ;
    cred:validFrom \"2023-01-01T00:00:00Z\"^^xsd:dateTime ;
    cred:credentialSubject [
        schema:alumniOf \"The School of Examples\" ;
        schema:address [ schema:addressLocality \"Springfield\" ; schema:postalCode \"12345\" ]
    ] ;
    sec:proof [
        a sec:DataIntegrityProof ;
        sec:cryptosuite \"eddsa-rdfc-2022\" ;
        sec:proofPurpose sec:assertionMethod
    ] .
";

fn credential_context() -> serde_json::Value {
    json!({
        "@context": {
            "cred": "https://www.w3.org/2018/credentials#",
            "schema": "https://schema.org/",
            "xsd": "http://www.w3.org/2001/XMLSchema#",
            "sec": { "@id": "https://w3id.org/security#", "@prefix": true },
            "name": "schema:name"
        }
    })
}

fn wide_dataset() -> Dataset {
    let mut ds = Dataset::new();
    for i in 0..64 {
        let subject = NamedNode::new(format!("http://example.org/s{i}"));
        ds.add_triple(
            subject.clone(),
            NamedNode::new("http://example.org/p"),
            Literal::new(format!("value {i}")),
        );
        let node = BlankNode::new(format!("n{i}"));
        ds.add_triple(subject, NamedNode::new("http://example.org/q"), node.clone());
        ds.add_triple(
            node,
            NamedNode::new(rdf::TYPE),
            NamedNode::new("http://example.org/Thing"),
        );
    }
    ds
}

fn bench_turtle_parse(c: &mut Criterion) {
    c.bench_function("turtle_parse", |b| {
        b.iter(|| turtle::parse(CREDENTIAL_TTL).unwrap())
    });
}

fn bench_turtle_serialize(c: &mut Criterion) {
    let ds = wide_dataset();
    let prefixes: PrefixTable = [("ex", "http://example.org/")].into_iter().collect();
    c.bench_function("turtle_serialize_inline", |b| {
        b.iter(|| turtle::serialize(&ds, Some(&prefixes)))
    });
}

fn bench_turtle_roundtrip(c: &mut Criterion) {
    c.bench_function("turtle_roundtrip", |b| {
        b.iter(|| {
            let ds = turtle::parse(CREDENTIAL_TTL).unwrap();
            turtle::serialize(&ds, None)
        })
    });
}

fn bench_nquads_parse(c: &mut Criterion) {
    let input = nquads::serialize_dataset(&wide_dataset());
    c.bench_function("nquads_parse", |b| b.iter(|| nquads::parse(&input).unwrap()));
}

fn bench_nquads_canonical(c: &mut Criterion) {
    let ds = wide_dataset();
    c.bench_function("nquads_serialize_canonical", |b| {
        b.iter(|| nquads::serialize_canonical(&ds))
    });
}

fn bench_prefixes_from_context(c: &mut Criterion) {
    let context = credential_context();
    c.bench_function("prefixes_from_jsonld_context", |b| {
        b.iter(|| PrefixTable::from_jsonld_context(&context).unwrap())
    });
}

criterion_group!(
    benches,
    bench_turtle_parse,
    bench_turtle_serialize,
    bench_turtle_roundtrip,
    bench_nquads_parse,
    bench_nquads_canonical,
    bench_prefixes_from_context,
);
criterion_main!(benches);
