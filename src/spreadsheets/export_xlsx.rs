use crate::domain::listing::{Listing, MINOR_PER_AZN};
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const HEADERS: [&str; 11] = [
    "Number",
    "Operator",
    "Prefix",
    "Type",
    "Price (AZN)",
    "Contact",
    "Status",
    "VIP",
    "Seller",
    "Created",
    "Expires",
];

fn write_str(ws: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), ServerError> {
    ws.write_string(row, col, value)
        .map_err(|e| ServerError::XlsxError(format!("Failed to write '{}' at row {row}: {e}", HEADERS[col as usize])))?;
    Ok(())
}

/// Listings as rows in one worksheet, serialized to bytes.
pub fn listings_workbook(listings: &[Listing]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{header}': {e}"))
            })?;
    }

    let yes_no = |b: bool| if b { "Yes" } else { "No" };
    let date = |ts: Option<chrono::DateTime<chrono::Utc>>| {
        ts.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_default()
    };

    for (i, listing) in listings.iter().enumerate() {
        let r = (i + 1) as u32;

        write_str(worksheet, r, 0, &listing.phone_number)?;
        write_str(worksheet, r, 1, listing.operator().name())?;
        write_str(worksheet, r, 2, &listing.operator_prefix)?;
        write_str(worksheet, r, 3, listing.tier.as_str())?;

        worksheet
            .write_number(r, 4, listing.price as f64 / MINOR_PER_AZN as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write price: {e}")))?;

        write_str(worksheet, r, 5, &listing.contact_phone)?;
        write_str(worksheet, r, 6, listing.status.as_str())?;
        write_str(worksheet, r, 7, yes_no(listing.is_vip))?;
        write_str(worksheet, r, 8, yes_no(listing.is_seller))?;
        write_str(worksheet, r, 9, &date(listing.created_at))?;
        write_str(worksheet, r, 10, &date(listing.expires_at))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}

pub fn export_listings_xlsx(listings: &[Listing]) -> ResultResp {
    let buffer = listings_workbook(listings)?;
    log::info!("Exported {} listings", listings.len());
    xlsx_response(buffer, "phone_numbers.xlsx")
}
