//! Line splitting and the built-in overview text.

/// Title used for the document rendered from [PAYMENT_GATEWAY_OVERVIEW]
pub const PAYMENT_GATEWAY_OVERVIEW_TITLE: &str = "Payment Gateway Communication Overview";

/// Prose describing how a web front end talks to payment providers through its
/// backend.
///
/// This is documentation content only. The provider names, fee percentages and
/// route paths below are plain text; nothing in this crate reads them as
/// configuration, validates them, or calls any of the services they name.
pub const PAYMENT_GATEWAY_OVERVIEW: &str = "Payment Gateway Communication Overview

1. Overview
- Front end never handles raw card data.
- All payment initiation requests go through the backend (`/api/payments/...`) with JWT in `Authorization` headers.
- The backend orchestrates Paystack, Flutterwave, Stripe, and bank transfer flows via dedicated services.

2. Property Purchase (Escrow) Flow
1. User clicks “Proceed to Purchase (Escrow)” on the property detail page.
2. `EscrowPaymentFlow` loads the property, calculates the 0.5% escrow fee, and presents a multi-step form (Review → Payment Details → Confirmation).
3. The frontend posts to `POST /api/payments/initialize` with:
   - `amount`: property price
   - `paymentMethod`: `flutterwave | paystack | stripe | bank_transfer`
   - `paymentType`: `property_purchase`
   - `relatedEntity`: { type: \"property\", id: propertyId }
   - `description`, `currency`, other metadata
4. Backend validates payload, creates a `Payment` record, and routes it to the appropriate provider service.
5. Provider service sends the request to Paystack/Flutterwave/Stripe and returns authorization data.
6. Frontend redirects the user to the provider’s checkout (or uses Stripe client).
7. Webhooks (`/api/payments/webhook/:provider`) confirm success and update payment status.
8. Escrow transaction is created on backend (`/api/escrow`), fees/timeline are recorded, and the property is held for vendor documents.

3. Vendor Listing Fee (Registration)
- Admin sets `vendorListingFee` via `/api/admin/settings`.
- During vendor registration, we render `VendorRegistrationPayment`, which calls `/api/payments/initialize` with `paymentType = vendor_listing`.
- After payment success, we call `registerAsVendor` to assign the vendor role and save the payment reference.

4. Backend Payment Orchestration
- `backend/routes/payments.js` enforces authentication (JWT) and validation (`express-validator`).
- Provider metadata includes amount, fees, customer details, and `relatedEntity`.
- Provider services compute platform (2.5%) + processing (1.5%) fees before invoking Paystack/Flutterwave/Stripe.
- Webhooks verify signatures and change payment statuses to `completed`, `failed`, etc.

5. Escrow Transaction Creation
- `EscrowPaymentFlow` uses `createEscrowTransaction` (Escrow context).
- `POST /api/escrow` checks property availability, prevents duplicate escrows, calculates fees, and creates the transaction record.
- Escrow records expose timeline entries and can be retrieved via `/api/escrow/:id`.

6. Security & Compliance Notes
- JWT required on all backend payment routes (`Authorization: Bearer <token>`).
- Validation middleware catches missing/invalid data before provider calls.
- Webhooks verify provider signatures.
- Sensitive keys stored in `.env` (Paystack, Flutterwave, Stripe).
- Escrow/payment data kept in MongoDB; no provider secrets reach the browser.

7. Bank Integration Checklist
- Provide test credentials for Paystack/Flutterwave (or bank API).
- Configure webhook endpoint(s) at `/api/payments/webhook/:provider`.
- Validate flows using existing Cypress E2E coverage or mock data.
- Monitor transactions through admin dashboards and backend logs.
- Escrow flow demonstrates multi-step proof for compliance (review → hold funds → release).
";

/// Split a block of text into lines on `\n`, dropping a trailing `\r` from each line.
///
/// The split is exact: a trailing newline yields a final empty line and consecutive
/// newlines yield empty lines, so no line is ever merged or skipped.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_empty_lines() {
        assert_eq!(split_lines("a\n\nb\n"), vec!["a", "", "b", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn split_handles_crlf() {
        assert_eq!(split_lines("a\r\nb"), split_lines("a\nb"));
    }

    #[test]
    fn overview_has_52_lines() {
        let lines = split_lines(PAYMENT_GATEWAY_OVERVIEW);
        assert_eq!(lines.len(), 52);
        assert_eq!(lines[0], PAYMENT_GATEWAY_OVERVIEW_TITLE);
        assert_eq!(lines[51], "");
    }
}
