// Property-based checks for the bill calculator

use billing::bill::{compute_bill, DiscountSpec, ItemKind, LineItem, TaxTreatment};
use proptest::prelude::*;

fn line_item(treatment: Option<TaxTreatment>) -> impl Strategy<Value = LineItem> {
    let treatment = match treatment {
        Some(t) => Just(t).boxed(),
        None => prop_oneof![Just(TaxTreatment::Inclusive), Just(TaxTreatment::Exclusive)].boxed(),
    };
    (
        0u32..1_000_000,
        1u32..20,
        prop::sample::select(vec![0.0, 5.0, 12.0, 18.0, 28.0]),
        treatment,
    )
        .prop_map(|(paise, quantity, gst_rate, tax_treatment)| LineItem {
            id: "item".to_string(),
            name: "Item".to_string(),
            code: "IT-1".to_string(),
            kind: ItemKind::Service,
            unit_price: f64::from(paise) / 100.0,
            quantity,
            gst_rate,
            tax_treatment,
        })
}

fn cart(treatment: Option<TaxTreatment>) -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(line_item(treatment), 0..8)
}

fn discount() -> impl Strategy<Value = DiscountSpec> {
    prop_oneof![Just(0.0), (0u32..=10_000).prop_map(|bp| f64::from(bp) / 100.0)].prop_map(
        |percentage| DiscountSpec {
            percentage,
            ..DiscountSpec::default()
        },
    )
}

proptest! {
    #[test]
    fn subtotal_is_sum_of_line_totals(
        services in cart(None),
        products in cart(None),
        spec in discount()
    ) {
        let bill = compute_bill(&services, &products, &spec).unwrap();
        let expected = services
            .iter()
            .chain(&products)
            .map(LineItem::line_total)
            .fold(0.0, |acc, total| acc + total);

        prop_assert_eq!(bill.subtotal, expected);
    }

    #[test]
    fn discount_is_taken_off_subtotal(
        services in cart(None),
        products in cart(None),
        spec in discount()
    ) {
        let bill = compute_bill(&services, &products, &spec).unwrap();
        prop_assert_eq!(bill.amount_after_discount, bill.subtotal - bill.discount_amount);
    }

    #[test]
    fn zero_discount_leaves_subtotal_untouched(
        services in cart(None),
        products in cart(None)
    ) {
        let bill = compute_bill(&services, &products, &DiscountSpec::none()).unwrap();
        prop_assert_eq!(bill.discount_amount, 0.0);
        prop_assert_eq!(bill.amount_after_discount.to_bits(), bill.subtotal.to_bits());
    }

    #[test]
    fn exclusive_gst_is_added_on_top(
        services in cart(Some(TaxTreatment::Exclusive)),
        spec in discount()
    ) {
        let bill = compute_bill(&services, &[], &spec).unwrap();
        prop_assert_eq!(bill.inclusive.total, 0.0);
        prop_assert_eq!(bill.final_amount, bill.amount_after_discount + bill.total_gst);
    }

    #[test]
    fn inclusive_gst_is_not_added_again(
        products in cart(Some(TaxTreatment::Inclusive)),
        spec in discount()
    ) {
        let bill = compute_bill(&[], &products, &spec).unwrap();
        prop_assert_eq!(bill.exclusive.total, 0.0);
        prop_assert_eq!(bill.final_amount, bill.amount_after_discount);
    }

    #[test]
    fn cgst_and_sgst_split_evenly(
        services in cart(None),
        products in cart(None),
        spec in discount()
    ) {
        let bill = compute_bill(&services, &products, &spec).unwrap();
        for bucket in [bill.exclusive, bill.inclusive] {
            prop_assert_eq!(bucket.cgst, bucket.sgst);
            prop_assert_eq!(bucket.cgst, bucket.total / 2.0);
        }
    }

    #[test]
    fn recomputation_is_idempotent(
        services in cart(None),
        products in cart(None),
        spec in discount()
    ) {
        let first = compute_bill(&services, &products, &spec).unwrap();
        let second = compute_bill(&services, &products, &spec).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn only_exclusive_bucket_reaches_final_amount(
        services in cart(None),
        products in cart(None),
        spec in discount()
    ) {
        let bill = compute_bill(&services, &products, &spec).unwrap();
        prop_assert_eq!(bill.total_gst, bill.exclusive.total + bill.inclusive.total);
        prop_assert_eq!(bill.final_amount, bill.amount_after_discount + bill.exclusive.total);
    }

    #[test]
    fn out_of_range_discount_is_rejected(
        services in cart(None),
        percentage in 100.01f64..1_000.0
    ) {
        let spec = DiscountSpec { percentage, ..DiscountSpec::default() };
        prop_assert!(compute_bill(&services, &[], &spec).is_err());
        prop_assert!(DiscountSpec::percentage(-percentage).is_err());
    }
}

#[test]
fn worked_examples() {
    let haircut = LineItem {
        id: "haircut".to_string(),
        name: "Haircut".to_string(),
        code: "SRV-001".to_string(),
        kind: ItemKind::Service,
        unit_price: 500.0,
        quantity: 1,
        gst_rate: 18.0,
        tax_treatment: TaxTreatment::Exclusive,
    };
    let bill = compute_bill(
        &[haircut],
        &[],
        &DiscountSpec::percentage(10.0).unwrap(),
    )
    .unwrap();
    assert_eq!(bill.discount_amount, 50.0);
    assert_eq!(bill.amount_after_discount, 450.0);
    assert_eq!(bill.total_gst, 81.0);
    assert_eq!(bill.cgst(), 40.5);
    assert_eq!(bill.sgst(), 40.5);
    assert_eq!(bill.final_amount, 531.0);

    let shampoo = LineItem {
        id: "shampoo".to_string(),
        name: "Shampoo".to_string(),
        code: "PRD-001".to_string(),
        kind: ItemKind::Product,
        unit_price: 1180.0,
        quantity: 1,
        gst_rate: 18.0,
        tax_treatment: TaxTreatment::Inclusive,
    };
    let bill = compute_bill(&[], &[shampoo], &DiscountSpec::none()).unwrap();
    assert_eq!(bill.taxable_value, 1000.0);
    assert_eq!(bill.total_gst, 180.0);
    assert_eq!(bill.final_amount, 1180.0);

    let bill = compute_bill(&[], &[], &DiscountSpec::none()).unwrap();
    assert_eq!(bill, billing::BillBreakdown::default());
}
