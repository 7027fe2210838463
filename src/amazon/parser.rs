//! XML parser for Product Advertising API responses.
//!
//! Elements are matched by local name, so the versioned default namespace
//! on the root element does not matter.

use crate::amazon::models::{ApiError, Image, Item, ItemsResponse, ListPrice};
use crate::error::PaapiError;
use roxmltree::{Document, Node};
use tracing::{debug, trace, warn};

fn is_named(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_named(n, name))
}

fn text(node: Node, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn number<T: std::str::FromStr + Default>(node: Node, name: &str) -> T {
    text(node, name).and_then(|t| t.parse().ok()).unwrap_or_default()
}

/// Parses an `ItemSearchResponse` or `ItemLookupResponse` body.
///
/// An empty body yields an empty response.
pub fn parse_items(xml: &str) -> Result<ItemsResponse, PaapiError> {
    if xml.trim().is_empty() {
        debug!("Empty response body");
        return Ok(ItemsResponse::default());
    }

    let document = Document::parse(xml)?;
    let root = document.root_element();

    let Some(items) = root.descendants().find(|n| is_named(n, "Items")) else {
        warn!("Response <{}> has no <Items> element", root.tag_name().name());
        return Ok(ItemsResponse { errors: collect_errors(root), ..ItemsResponse::default() });
    };

    let mut response = ItemsResponse::default();

    if let Some(request) = child(items, "Request") {
        response.is_valid =
            text(request, "IsValid").is_some_and(|v| v.eq_ignore_ascii_case("true"));
        response.errors = collect_errors(request);
    }

    response.total_results = number(items, "TotalResults");
    response.total_pages = number(items, "TotalPages");
    response.more_search_results_url = text(items, "MoreSearchResultsUrl");

    for node in items.children().filter(|n| is_named(n, "Item")) {
        match parse_item(node) {
            Some(item) => {
                trace!("Parsed item: {}", item.asin);
                response.items.push(item);
            }
            None => trace!("Skipping item without ASIN"),
        }
    }

    debug!(
        "Parsed {} items (total_results: {}, total_pages: {})",
        response.items.len(),
        response.total_results,
        response.total_pages
    );

    Ok(response)
}

/// Extracts the first `<Error>` from an error document, if any.
pub fn parse_error(xml: &str) -> Option<ApiError> {
    let document = Document::parse(xml).ok()?;
    collect_errors(document.root_element()).into_iter().next()
}

fn collect_errors(node: Node) -> Vec<ApiError> {
    node.descendants()
        .filter(|n| is_named(n, "Error"))
        .map(|n| ApiError {
            code: text(n, "Code").unwrap_or_default(),
            message: text(n, "Message").unwrap_or_default(),
        })
        .collect()
}

fn parse_item(node: Node) -> Option<Item> {
    let asin = text(node, "ASIN")?;

    // Some response groups only carry images inside ImageSets
    let image_set = child(node, "ImageSets").and_then(|sets| child(sets, "ImageSet"));
    let image = |name: &str| {
        parse_image(node, name).or_else(|| image_set.and_then(|set| parse_image(set, name)))
    };

    let mut item = Item {
        asin,
        detail_page_url: text(node, "DetailPageURL"),
        small_image: image("SmallImage"),
        medium_image: image("MediumImage"),
        large_image: image("LargeImage"),
        ..Item::default()
    };

    if let Some(attributes) = child(node, "ItemAttributes") {
        item.title = text(attributes, "Title");
        item.authors = attributes
            .children()
            .filter(|n| is_named(n, "Author"))
            .filter_map(|n| n.text())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        item.binding = text(attributes, "Binding");
        item.brand = text(attributes, "Brand");
        item.ean = text(attributes, "EAN");
        item.label = text(attributes, "Label");
        item.list_price = child(attributes, "ListPrice").map(|price| ListPrice {
            amount: number(price, "Amount"),
            currency_code: text(price, "CurrencyCode").unwrap_or_default(),
            formatted_price: text(price, "FormattedPrice").unwrap_or_default(),
        });
    }

    Some(item)
}

fn parse_image(node: Node, name: &str) -> Option<Image> {
    let image = child(node, name)?;
    Some(Image {
        url: text(image, "URL")?,
        height: number(image, "Height"),
        width: number(image, "Width"),
    })
}
