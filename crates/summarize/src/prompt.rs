/// Build the extraction prompt for a receipt's OCR text.
///
/// The instructions pin the model to a strict JSON object so the answer can
/// be validated downstream. The OCR text is embedded verbatim — no
/// trimming or escaping, the model copes with noise better than we can
/// clean it.
pub fn build_receipt_prompt(ocr_text: &str) -> String {
    format!(
        r#"We are processing a receipt whose text may be noisy or irregularly formatted.
Extract the following details from the receipt text below, ensuring the
response is clear and correctly formatted:

1. Market name: the name of the market/store.
2. Date: the date the receipt was issued, with day, month and year.
3. Time: the time the receipt was issued (e.g. 12:55).
4. City: the city where the receipt was issued.
5. Total price: the final amount on the receipt. Remove stray spaces and
   misplaced symbols; return only the final price with "TL" appended at the
   end, keeping any kurus value (e.g. 100.75 TL).
6. Items: the purchased items with their individual prices. Item names
   should be clean and prices formatted as numbers with "TL" appended.

Also include the name of the receipt holder, if it is present.

Answer strictly as a JSON object with the following fields:
- "market": (string) name of the market/store.
- "date": (string) the date of the receipt.
- "time": (string) the time the receipt was issued.
- "city": (string) the city where the receipt was issued.
- "total": (string) the total price, formatted as described.
- "items": (array of objects) the purchased items, each as:
  - "name": (string) the item name.
  - "price": (string) the item price (e.g. "20.50 TL").
- "holder": (string, optional) the receipt holder's name.

Receipt text:
{ocr_text}
"#
    )
}
