// Prompt builder
// Turns one user's transaction table into the system/user instruction pair
// sent to the model. Pure: no side effects, generated fresh per request.

use anyhow::{anyhow, bail, Result};
use csv::Writer;

use crate::entities::{TransactionRow, TransactionTable};

/// Number of most recent rows fed to the model. The window is a positional
/// suffix of the upload, not a time sort: upstream data is assumed to arrive
/// in chronological order.
pub const RECENT_WINDOW: usize = 25;

const PROMPT_COLUMNS: [&str; 9] = [
    "trans_date_trans_time",
    "cc_num",
    "merchant",
    "category",
    "amt",
    "trans_num",
    "unix_time",
    "merch_lat",
    "merch_long",
];

/// The two instruction blocks sent to the model.
#[derive(Debug, Clone)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Builds the prompt pair for one upload. Fails only on an empty table;
/// callers guard against empty input before reaching this point.
pub fn build_prompt(table: &TransactionTable) -> Result<PromptPair> {
    let window = recent_window(table.rows());
    let Some(identity) = window.first() else {
        bail!("transaction table has no rows");
    };

    let transactions_text = transaction_block(window)?;
    Ok(PromptPair {
        system: system_instruction(identity),
        user: user_instruction(identity, &transactions_text),
    })
}

fn recent_window(rows: &[TransactionRow]) -> &[TransactionRow] {
    let start = rows.len().saturating_sub(RECENT_WINDOW);
    &rows[start..]
}

/// Serializes the windowed rows projected onto the fixed column set as
/// CSV-style text with a header line.
fn transaction_block(rows: &[TransactionRow]) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(PROMPT_COLUMNS)?;
    for row in rows {
        writer.write_record(&[
            row.trans_date_trans_time.clone(),
            row.cc_num.clone(),
            row.merchant.clone(),
            row.category.clone(),
            row.amt.to_string(),
            row.trans_num.clone(),
            row.unix_time.to_string(),
            row.merch_lat.to_string(),
            row.merch_long.to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("serialize transaction block: {err}"))?;
    Ok(String::from_utf8(bytes)?)
}

fn system_instruction(identity: &TransactionRow) -> String {
    format!(
        r#"You are an AI Fraud Analyst Assistant. Your role is to analyze transaction data for a single user and detect suspicious or potentially fraudulent activity.

User context:
- First name: {first}
- Last name: {last}
- Date of birth: {dob}
- Address: {street}

You will receive this user's transactions with the following columns:
- trans_date_trans_time, cc_num, merchant, category, amt, trans_num, unix_time, merch_lat, merch_long

Instructions for categories:
- Some category codes may not be standard or known.
- Try to interpret the category into a readable description. For example, 'grocery_pos' -> 'Grocery store purchase', 'misc_net' -> 'Miscellaneous online purchase'.
- If unsure about the exact meaning, describe it as a type of purchase or merchant in plain language.

Your task:
- Flag any transaction that is unusual or potentially suspicious, including borderline cases, even if the pattern is not very strong.
- Explain why each flagged transaction is suspicious using **specific reasoning**:
    - Consider whether the transaction amount is unusually high or low for the type of purchase or merchant.
    - Consider the timing of the transaction (e.g., late night, early morning, or unusual hours).
    - Consider patterns, such as multiple high-value transactions in a short time period.
    - Consider merchant names as context, but do not flag solely because of the word 'fraud'.
- Include the specific amount, interpreted category description, and transaction time in your explanation when relevant.
- If a category code is unclear, make a reasoned, plain-language guess about the type of purchase.
- Stay professional, clear, and structured.
- Only use the information provided; do not invent external data.

Output JSON in the following format, array of objects:

[{{
  "trans_num": "string",
  "trans_date_trans_time": "YYYY-MM-DD HH:MM:SS",
  "reason": "string",
  "confidence": "low | medium | high"
}}]"#,
        first = identity.first,
        last = identity.last,
        dob = identity.dob,
        street = identity.street,
    )
}

fn user_instruction(identity: &TransactionRow, transactions_text: &str) -> String {
    format!(
        "Here is the transaction history for {first} {last}:\n\n{transactions}\n\nPlease review the transactions and return ONLY the JSON array in the format specified above.",
        first = identity.first,
        last = identity.last,
        transactions = transactions_text,
    )
}
