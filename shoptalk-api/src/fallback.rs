//! Rule-based fallback responses.
//!
//! When the remote model is unavailable or fails, replies come from an
//! ordered table of keyword rules. Rules are evaluated in fixed priority
//! order and the first match wins; matching is case-insensitive substring
//! matching against each rule's vocabulary. New categories are added to the
//! table, not to control flow.

/// One fallback category.
pub struct FallbackRule {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

/// Ordered rule table. Priority: greeting, customer, product, sales,
/// category, schema, help.
pub const RULES: &[FallbackRule] = &[
    FallbackRule {
        category: "greeting",
        keywords: &["hello", "hi", "hey", "greetings"],
        response: "Hello! I'm your polite database assistant for this e-commerce system. \
            I'm here to help you understand and analyze your database containing information \
            about categories, products, customers, and transactions. How may I assist you today?",
    },
    FallbackRule {
        category: "customer",
        keywords: &["customer", "customers", "user", "users"],
        response: "I'd be happy to help you with customer information! Our database contains \
            comprehensive customer details including names, contact information, demographics, \
            and registration dates. We have customers from major cities across the country. \
            Would you like me to help you analyze customer data, demographics, or suggest \
            specific queries for customer insights?",
    },
    FallbackRule {
        category: "product",
        keywords: &["product", "products", "inventory", "stock"],
        response: "I can certainly assist you with product and inventory analysis! Our product \
            database includes items across multiple categories such as Electronics (smartphones, \
            laptops, headphones), Clothing (t-shirts, jeans, shoes), Beauty products (cosmetics, \
            personal care), and more. Each product has detailed information including pricing, \
            stock quantities, and descriptions. What specific product information would you \
            like to explore?",
    },
    FallbackRule {
        category: "sales",
        keywords: &["sales", "transaction", "transactions", "revenue", "money"],
        response: "I'm here to help you analyze sales and transaction data! Our comprehensive \
            transaction records include payment methods (Credit Card, Debit Card, Cash, PayPal), \
            transaction dates, amounts, and detailed line items. I can help you understand sales \
            patterns, customer purchase behavior, and revenue trends. What specific sales \
            insights would you like me to help you with?",
    },
    FallbackRule {
        category: "category",
        keywords: &["category", "categories"],
        response: "I'd be pleased to help you understand our product categories! Our database \
            organizes products into well-defined categories: Electronics, Clothing, Beauty, \
            Home & Garden, and Sports. Each category contains multiple products with detailed \
            descriptions and relationships. Would you like to explore category-wise analysis \
            or see how products are distributed across categories?",
    },
    FallbackRule {
        category: "schema",
        keywords: &["database", "schema", "table", "tables", "structure"],
        response: "I'm happy to explain our database structure! Our e-commerce database \
            consists of 5 main tables: Categories, Products, Customers, Transactions, and \
            Transaction Details. These tables are thoughtfully connected through foreign key \
            relationships to maintain data integrity and enable comprehensive analysis. Would \
            you like me to explain any specific table structure, relationships, or suggest \
            ways to query the data?",
    },
    FallbackRule {
        category: "help",
        keywords: &["help", "what", "how", "can you"],
        response: "I'm here to provide friendly assistance with your e-commerce database! \
            I can help you with customer analytics (demographics, behavior, registration \
            patterns), product management (inventory levels, categories, pricing insights), \
            sales analysis (transaction trends, revenue patterns, payment preferences), and \
            database structure (table relationships and useful queries). I remember our \
            conversation context, so feel free to ask follow-up questions. What would you \
            like to explore first?",
    },
];

/// Default courteous response when no rule matches.
pub const DEFAULT_RESPONSE: &str = "Thank you for your message! I'm your helpful database \
    assistant for this e-commerce system. I have comprehensive knowledge about your database \
    schema including categories, products, customers, and transactions. Could you please let \
    me know what specific aspect of your database you'd like to explore? I'm here to help \
    with data analysis, explanations, or any questions you might have!";

/// Select the canned reply for a message.
pub fn select(message: &str) -> &'static str {
    let message = message.to_lowercase();

    for rule in RULES {
        if rule.keywords.iter().any(|kw| message.contains(kw)) {
            tracing::debug!(category = rule.category, "Fallback rule matched");
            return rule.response;
        }
    }

    tracing::debug!("No fallback rule matched, using default response");
    DEFAULT_RESPONSE
}

/// The category a message would resolve to, if any. Used for introspection
/// and tests.
pub fn category_for(message: &str) -> Option<&'static str> {
    let message = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| message.contains(kw)))
        .map(|rule| rule.category)
}
