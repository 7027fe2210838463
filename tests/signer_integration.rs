//! Integration tests for request signing against known vectors.

use amz_paapi::amazon::signer::{escape, Protocol};
use amz_paapi::amazon::{Credentials, Endpoint, FixedClock, ParameterSet, Region, RequestSigner};

fn clean_code_params() -> ParameterSet {
    [
        ("SearchIndex", "Books"),
        ("Keywords", "Clean Code"),
        ("ResponseGroup", "Images,ItemAttributes"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn spain_signer() -> RequestSigner {
    RequestSigner::new(
        Credentials::new("AWSK", "AWSS", "collectus-21"),
        Endpoint::from_region_code("ES").unwrap(),
    )
    .with_clock(FixedClock::parse("2017-07-26T23:00:00+09:00").unwrap())
}

fn query_keys(url: &str) -> Vec<String> {
    let (_, query) = url.split_once('?').unwrap();
    query.split('&').map(|pair| pair.split('=').next().unwrap().to_string()).collect()
}

#[test]
fn test_clean_code_search_vector() {
    let signed = spain_signer().sign(&clean_code_params()).unwrap();

    assert_eq!(
        signed.canonical_query(),
        "AWSAccessKeyId=AWSK&AssociateTag=collectus-21&Keywords=Clean%20Code\
         &Operation=ItemSearch&ResponseGroup=Images%2CItemAttributes&SearchIndex=Books\
         &Service=AWSECommerceService&Timestamp=2017-07-26T14%3A00%3A00Z\
         &Version=2013-08-01"
    );
    assert_eq!(
        signed.string_to_sign(),
        format!("GET\nwebservices.amazon.es\n/onca/xml\n{}", signed.canonical_query())
    );
    assert_eq!(signed.signature(), "c9RAk434K7PxrhWVR6HqJcTG1wGWU22hsPFuy+97t5w=");
    assert_eq!(signed.timestamp(), "2017-07-26T14:00:00Z");
}

#[test]
fn test_signed_url_parameter_order() {
    let signed = spain_signer().sign(&clean_code_params()).unwrap();

    assert!(signed.url().starts_with("https://webservices.amazon.es/onca/xml?"));
    assert_eq!(
        query_keys(signed.url()),
        vec![
            "AWSAccessKeyId",
            "AssociateTag",
            "Keywords",
            "Operation",
            "ResponseGroup",
            "SearchIndex",
            "Service",
            "Signature",
            "Timestamp",
            "Version",
        ]
    );
    assert!(signed
        .url()
        .contains("&Signature=c9RAk434K7PxrhWVR6HqJcTG1wGWU22hsPFuy%2B97t5w%3D&Timestamp="));
}

#[test]
fn test_url_never_contains_plus() {
    let mut params = clean_code_params();
    params.insert("Keywords".to_string(), "C++ for the impatient".to_string());

    let signed = spain_signer().sign(&params).unwrap();
    assert!(!signed.url().contains('+'));
    assert!(signed.url().contains("Keywords=C%2B%2B%20for%20the%20impatient"));
}

#[test]
fn test_empty_parameter_set_vector() {
    let signer = RequestSigner::new(
        Credentials::new("AKIDEXAMPLE", "1234567890", "mytag-20"),
        Endpoint::for_region(Region::Us),
    )
    .with_clock(FixedClock::parse("2014-08-18T12:00:00Z").unwrap());

    let signed = signer.sign(&ParameterSet::new()).unwrap();
    assert_eq!(signed.signature(), "J3gPHCegTZGW7FnWrMzuoZMdinh+RC9JUVeO2DU2zuk=");
    assert!(signed.url().contains("Timestamp=2014-08-18T12%3A00%3A00Z"));
}

#[test]
fn test_signature_depends_on_host() {
    let params = clean_code_params();
    let spain = spain_signer().sign(&params).unwrap();

    let germany = RequestSigner::new(
        Credentials::new("AWSK", "AWSS", "collectus-21"),
        Endpoint::for_region(Region::De),
    )
    .with_clock(FixedClock::parse("2017-07-26T23:00:00+09:00").unwrap())
    .sign(&params)
    .unwrap();

    assert_eq!(spain.canonical_query(), germany.canonical_query());
    assert_ne!(spain.signature(), germany.signature());
}

#[test]
fn test_endpoint_override_keeps_port_in_string_to_sign() {
    let signer = RequestSigner::new(
        Credentials::new("AWSK", "AWSS", "collectus-21"),
        Endpoint::parse("http://127.0.0.1:8080").unwrap(),
    )
    .with_clock(FixedClock::parse("2017-07-26T23:00:00+09:00").unwrap());

    let signed = signer.sign(&clean_code_params()).unwrap();
    assert!(signed.string_to_sign().starts_with("GET\n127.0.0.1:8080\n/onca/xml\n"));
    assert!(signed.url().starts_with("http://127.0.0.1:8080/onca/xml?"));
}

#[test]
fn test_custom_protocol_version() {
    let signer = spain_signer().with_protocol(Protocol {
        version: "2011-08-01".to_string(),
        ..Protocol::default()
    });

    let signed = signer.sign(&clean_code_params()).unwrap();
    assert!(signed.canonical_query().ends_with("&Version=2011-08-01"));
    assert_ne!(signed.signature(), "c9RAk434K7PxrhWVR6HqJcTG1wGWU22hsPFuy+97t5w=");
}

#[test]
fn test_escape_unreserved() {
    assert_eq!(escape("AZaz09-_.~"), "AZaz09-_.~");
    assert_eq!(escape(" "), "%20");
    assert_eq!(escape("é"), "%C3%A9");
}
