//! Prompt composition for the remote model.
//!
//! The composed prompt is the static schema persona, the most recent
//! transcript window rendered as `Role: content` lines, and the new user
//! message.

use crate::session::Turn;

/// Number of most-recent turns included in the prompt context.
pub const HISTORY_WINDOW: usize = 10;

/// Static persona and domain briefing for the assistant.
pub const SYSTEM_CONTEXT: &str = "\
You are a helpful and polite database assistant for an e-commerce system. You have access to the following database schema:

DATABASE SCHEMA:
1. categories (category_id, category_name, description, created_date)
   - Categories: Electronics, Clothing, Beauty, Home & Garden, Sports

2. products (product_id, product_name, category_id, price, stock_quantity, description, created_date)
   - Products include smartphones, laptops, t-shirts, jeans, cosmetics, etc.

3. customers (customer_id, first_name, last_name, email, phone, gender, age, address, city, registration_date)
   - Customers from various cities like New York, Los Angeles, Chicago, etc.

4. transactions (transaction_id, customer_id, transaction_date, total_amount, payment_method, status)
   - Payment methods: Credit Card, Debit Card, Cash, PayPal

5. transaction_details (detail_id, transaction_id, product_id, quantity, unit_price, line_total)
   - Detailed line items for each transaction

RELATIONSHIPS:
- products.category_id -> categories.category_id
- transactions.customer_id -> customers.customer_id
- transaction_details.transaction_id -> transactions.transaction_id
- transaction_details.product_id -> products.product_id

PERSONALITY AND BEHAVIOR:
- Always be polite, helpful, and professional
- Remember the conversation context and refer to previous messages when relevant
- Provide detailed and informative responses
- If asked about data analysis, suggest helpful SQL queries or insights
- Use proper greetings and courteous language

CAPABILITIES:
- Analyze sales data and trends
- Provide customer insights and demographics
- Help with product inventory questions
- Explain database relationships and structure
- Suggest useful SQL queries for data analysis

Please maintain a helpful and polite tone throughout our conversation.";

/// Render the most recent transcript window as `Role: content` lines.
///
/// Turns with empty content are skipped and logged rather than propagated
/// into the model prompt.
pub fn render_history(turns: &[Turn]) -> String {
    let start = turns.len().saturating_sub(HISTORY_WINDOW);
    let mut history = String::new();

    for turn in &turns[start..] {
        if turn.content.trim().is_empty() {
            tracing::warn!(role = ?turn.role, "Skipping empty transcript turn");
            continue;
        }
        history.push_str(turn.role.label());
        history.push_str(": ");
        history.push_str(&turn.content);
        history.push('\n');
    }

    history
}

/// Compose the full prompt for one chat call.
pub fn compose(turns: &[Turn], message: &str) -> String {
    format!(
        "{}\n\nPrevious conversation:\n{}\nCurrent user input: {}\n\n\
         Please provide a helpful and polite response based on the database \
         context and conversation history.",
        SYSTEM_CONTEXT,
        render_history(turns),
        message
    )
}
