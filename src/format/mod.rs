//! Output formatting for items (table, JSON, markdown, CSV).

use crate::amazon::{Item, ItemsResponse};
use crate::config::OutputFormat;

/// Formats items for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single item.
    pub fn format_item(&self, item: &Item) -> String {
        match self.format {
            OutputFormat::Json => self.json(item, "{}"),
            OutputFormat::Table => self.table_single(item),
            OutputFormat::Markdown => self.markdown_single(item),
            OutputFormat::Csv => self.csv_items(std::slice::from_ref(item)),
        }
    }

    /// Formats multiple items.
    pub fn format_items(&self, items: &[Item]) -> String {
        if items.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No items found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json(items, "[]"),
            OutputFormat::Table => self.table_items(items),
            OutputFormat::Markdown => self.markdown_items(items),
            OutputFormat::Csv => self.csv_items(items),
        }
    }

    /// Formats a whole response. JSON keeps the totals and errors; the
    /// other formats list the items followed by API errors, if any.
    pub fn format_response(&self, response: &ItemsResponse) -> String {
        if self.format == OutputFormat::Json {
            return self.json(response, "{}");
        }

        let mut out = self.format_items(&response.items);

        if matches!(self.format, OutputFormat::Table | OutputFormat::Markdown)
            && response.total_results > 0
        {
            out.push_str(&format!(
                "\n{} results across {} pages",
                response.total_results, response.total_pages
            ));
        }

        if self.format != OutputFormat::Csv {
            for error in &response.errors {
                out.push_str(&format!("\nError {}: {}", error.code, error.message));
            }
        }

        out
    }

    fn json<T: serde::Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
    }

    // Table formatting

    fn table_single(&self, item: &Item) -> String {
        let mut lines = Vec::new();

        lines.push(format!("ASIN:    {}", item.asin));
        lines.push(format!("Title:   {}", item.title.as_deref().unwrap_or("N/A")));

        if let Some(authors) = item.author_line() {
            lines.push(format!("Author:  {}", authors));
        }
        if let Some(binding) = &item.binding {
            lines.push(format!("Binding: {}", binding));
        }
        if let Some(brand) = &item.brand {
            lines.push(format!("Brand:   {}", brand));
        }

        lines.push(format!("Price:   {}", price_text(item)));

        if let Some(image) = item.best_image() {
            lines.push(format!("Image:   {}", image.url));
        }
        if let Some(url) = &item.detail_page_url {
            lines.push(format!("URL:     {}", url));
        }

        lines.join("\n")
    }

    fn table_items(&self, items: &[Item]) -> String {
        let asin_width = 10;
        let price_width = 14;
        let binding_width = 12;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<asin_width$}  {:<price_width$}  {:<binding_width$}  {}",
            "ASIN", "Price", "Binding", "Title"
        ));
        lines.push(format!(
            "{:-<asin_width$}  {:-<price_width$}  {:-<binding_width$}  {:-<title_width$}",
            "", "", "", ""
        ));

        for item in items {
            let binding = truncate(item.binding.as_deref().unwrap_or(""), binding_width);
            let title = truncate(item.title.as_deref().unwrap_or("N/A"), title_width);

            lines.push(format!(
                "{:<asin_width$}  {:>price_width$}  {:<binding_width$}  {}",
                item.asin,
                price_text(item),
                binding,
                title
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} items", items.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_single(&self, item: &Item) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", item.title.as_deref().unwrap_or(&item.asin)));
        lines.push(String::new());

        lines.push(format!("- **ASIN:** {}", item.asin));
        if let Some(url) = &item.detail_page_url {
            lines.push(format!("- **URL:** [View on Amazon]({})", url));
        }
        if let Some(authors) = item.author_line() {
            lines.push(format!("- **Author:** {}", authors));
        }
        if item.list_price.is_some() {
            lines.push(format!("- **Price:** {}", price_text(item)));
        }
        if let Some(image) = item.best_image() {
            lines.push(format!("- **Image:** ![]({})", image.url));
        }

        lines.join("\n")
    }

    fn markdown_items(&self, items: &[Item]) -> String {
        let mut lines = Vec::new();

        lines.push("| ASIN | Price | Binding | Title |".to_string());
        lines.push("|------|-------|---------|-------|".to_string());

        for item in items {
            let title = truncate(item.title.as_deref().unwrap_or("N/A"), 40);
            let title = match &item.detail_page_url {
                Some(url) => format!("[{}]({})", title, url),
                None => title,
            };

            lines.push(format!(
                "| {} | {} | {} | {} |",
                item.asin,
                price_text(item),
                item.binding.as_deref().unwrap_or(""),
                title
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} items found*", items.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "asin,title,authors,binding,brand,ean,amount,currency,formatted_price,image,url".to_string()
    }

    fn csv_items(&self, items: &[Item]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for item in items {
            let price = item.list_price.as_ref();

            let fields = [
                item.asin.clone(),
                item.title.clone().unwrap_or_default(),
                item.author_line().unwrap_or_default(),
                item.binding.clone().unwrap_or_default(),
                item.brand.clone().unwrap_or_default(),
                item.ean.clone().unwrap_or_default(),
                price.map(|p| p.amount.to_string()).unwrap_or_default(),
                price.map(|p| p.currency_code.clone()).unwrap_or_default(),
                price.map(|p| p.formatted_price.clone()).unwrap_or_default(),
                item.best_image().map(|i| i.url.clone()).unwrap_or_default(),
                item.detail_page_url.clone().unwrap_or_default(),
            ];

            lines.push(fields.iter().map(|f| Self::csv_escape(f)).collect::<Vec<_>>().join(","));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

fn price_text(item: &Item) -> String {
    match &item.list_price {
        Some(p) if !p.formatted_price.is_empty() => p.formatted_price.clone(),
        Some(p) => format!("{} {:.2}", p.currency_code, p.major_units()),
        None => "N/A".to_string(),
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::{ApiError, Image, ListPrice};

    fn make_item() -> Item {
        Item {
            asin: "0132350882".to_string(),
            detail_page_url: Some("https://www.amazon.es/dp/0132350882".to_string()),
            title: Some("Clean Code: A Handbook of Agile Software Craftsmanship".to_string()),
            authors: vec!["Robert C. Martin".to_string()],
            binding: Some("Paperback".to_string()),
            list_price: Some(ListPrice {
                amount: 3999,
                currency_code: "EUR".to_string(),
                formatted_price: "EUR 39,99".to_string(),
            }),
            large_image: Some(Image { url: "https://img/large.jpg".into(), height: 500, width: 379 }),
            ..Item::default()
        }
    }

    fn make_minimal_item() -> Item {
        Item { asin: "B000000000".to_string(), ..Item::default() }
    }

    #[test]
    fn test_json_single_item() {
        let output = Formatter::new(OutputFormat::Json).format_item(&make_item());
        assert!(output.contains("\"asin\": \"0132350882\""));
        assert!(output.contains("Robert C. Martin"));
    }

    #[test]
    fn test_json_empty() {
        assert_eq!(Formatter::new(OutputFormat::Json).format_items(&[]), "[]");
    }

    #[test]
    fn test_table_single_item() {
        let output = Formatter::new(OutputFormat::Table).format_item(&make_item());
        assert!(output.contains("ASIN:    0132350882"));
        assert!(output.contains("Author:  Robert C. Martin"));
        assert!(output.contains("Price:   EUR 39,99"));
        assert!(output.contains("Image:   https://img/large.jpg"));
    }

    #[test]
    fn test_table_single_minimal_item() {
        let output = Formatter::new(OutputFormat::Table).format_item(&make_minimal_item());
        assert!(output.contains("Title:   N/A"));
        assert!(output.contains("Price:   N/A"));
        assert!(!output.contains("Author"));
    }

    #[test]
    fn test_table_multiple_items() {
        let output =
            Formatter::new(OutputFormat::Table).format_items(&[make_item(), make_minimal_item()]);
        assert!(output.contains("ASIN"));
        assert!(output.contains("0132350882"));
        assert!(output.contains("B000000000"));
        assert!(output.contains("Total: 2 items"));
        // Title truncated to the column width
        assert!(output.contains("Clean Code: A Handbook of Agile Software Crafts..."));
    }

    #[test]
    fn test_table_empty() {
        assert_eq!(Formatter::new(OutputFormat::Table).format_items(&[]), "No items found.");
    }

    #[test]
    fn test_markdown_items() {
        let output = Formatter::new(OutputFormat::Markdown).format_items(&[make_item()]);
        assert!(output.starts_with("| ASIN | Price | Binding | Title |"));
        assert!(output.contains("](https://www.amazon.es/dp/0132350882)"));
        assert!(output.contains("*1 items found*"));
    }

    #[test]
    fn test_markdown_single_minimal() {
        let output = Formatter::new(OutputFormat::Markdown).format_item(&make_minimal_item());
        assert!(output.starts_with("## B000000000"));
        assert!(!output.contains("Price"));
    }

    #[test]
    fn test_csv_items() {
        let output = Formatter::new(OutputFormat::Csv).format_items(&[make_item()]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("asin,title,"));
        assert!(lines[1].starts_with("0132350882,Clean Code: A Handbook"));
        assert!(lines[1].contains(",3999,EUR,\"EUR 39,99\","));
    }

    #[test]
    fn test_csv_empty() {
        let output = Formatter::new(OutputFormat::Csv).format_items(&[]);
        assert_eq!(output, Formatter::new(OutputFormat::Csv).csv_header());
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(Formatter::csv_escape("simple"), "simple");
        assert_eq!(Formatter::csv_escape("a,b"), "\"a,b\"");
        assert_eq!(Formatter::csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_price_text_without_formatted_price() {
        let mut item = make_item();
        item.list_price = Some(ListPrice {
            amount: 1999,
            currency_code: "USD".to_string(),
            formatted_price: String::new(),
        });
        assert_eq!(price_text(&item), "USD 19.99");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("日本語のタイトルです", 6), "日本語...");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_format_response_totals_and_errors() {
        let response = ItemsResponse {
            is_valid: false,
            errors: vec![ApiError { code: "AWS.ECommerceService.NoExactMatches".into(), message: "No results".into() }],
            total_results: 0,
            total_pages: 0,
            more_search_results_url: None,
            items: Vec::new(),
        };

        let table = Formatter::new(OutputFormat::Table).format_response(&response);
        assert!(table.contains("No items found."));
        assert!(table.contains("Error AWS.ECommerceService.NoExactMatches: No results"));

        let json = Formatter::new(OutputFormat::Json).format_response(&response);
        assert!(json.contains("\"is_valid\": false"));

        let mut response = response;
        response.errors.clear();
        response.items.push(make_item());
        response.total_results = 120;
        response.total_pages = 12;
        let table = Formatter::new(OutputFormat::Table).format_response(&response);
        assert!(table.contains("120 results across 12 pages"));
    }
}
