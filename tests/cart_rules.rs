use chrono::Utc;
use storefront_api::{
    error::AppError,
    cart::{AppliedCoupon, Cart},
    dto::{cart::CartView, orders::OrderConfirmation},
    models::{Order, Product},
    pricing::{CartTotals, effective_price, percent_of, validate_percentage},
};
use uuid::Uuid;

fn product(name: &str, price: f64, discount: f64) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: name.into(),
        price,
        discount,
        image: format!("https://img.example/{name}.png"),
        description: format!("{name} description"),
        category: "t-shirts".into(),
        created_at: Utc::now(),
    }
}

fn coupon(code: &str, discount: f64) -> Option<AppliedCoupon> {
    Some(AppliedCoupon {
        code: code.into(),
        discount,
    })
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn effective_price_applies_product_discount() {
    assert_close(effective_price(500.0, 0.0), 500.0);
    assert_close(effective_price(500.0, 20.0), 400.0);
    assert_close(effective_price(799.0, 10.0), 719.1);
    assert_close(effective_price(100.0, 100.0), 0.0);
}

#[test]
fn effective_price_stays_non_negative_for_valid_discounts() {
    for price in [0.0, 0.01, 1.0, 349.0, 99_999.99] {
        for discount in [0.0, 0.5, 12.5, 50.0, 99.0, 99.99] {
            assert!(effective_price(price, discount) >= 0.0);
        }
    }
}

#[test]
fn percent_of_amount() {
    assert_close(percent_of(200.0, 10.0), 20.0);
    assert_close(percent_of(0.0, 50.0), 0.0);
}

#[test]
fn percentage_validation_bounds() {
    assert!(validate_percentage(0.0, "discount").is_ok());
    assert!(validate_percentage(100.0, "discount").is_ok());
    assert!(validate_percentage(-1.0, "discount").is_err());
    assert!(validate_percentage(100.5, "discount").is_err());
    assert!(validate_percentage(f64::NAN, "discount").is_err());
    assert!(validate_percentage(f64::INFINITY, "discount").is_err());
}

#[test]
fn adding_same_product_twice_increments_quantity() {
    let shirt = product("shirt", 500.0, 0.0);
    let mut cart = Cart::default();

    cart.add_product(&shirt).expect("add");
    cart.add_product(&shirt).expect("add");

    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.item_count(), 2);
}

#[test]
fn adding_keeps_insertion_order() {
    let first = product("first", 100.0, 0.0);
    let second = product("second", 200.0, 0.0);
    let mut cart = Cart::default();

    cart.add_product(&first).expect("add");
    cart.add_product(&second).expect("add");
    cart.add_product(&first).expect("add");

    let ids: Vec<Uuid> = cart.items.iter().map(|i| i.product_id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn added_item_snapshots_product_fields() {
    let mug = product("mug", 349.0, 5.0);
    let mut cart = Cart::default();
    cart.add_product(&mug).expect("add");

    let item = &cart.items[0];
    assert_eq!(item.name, "mug");
    assert_close(item.price, 349.0);
    assert_close(item.discount, 5.0);
    assert_eq!(item.image, mug.image);
    assert_eq!(item.category, "t-shirts");
    assert_eq!(item.quantity, 1);
}

#[test]
fn adding_at_max_quantity_is_rejected_and_keeps_line_positive() {
    let shirt = product("shirt", 500.0, 0.0);
    let mut cart = Cart::default();
    cart.add_product(&shirt).expect("add");
    assert!(cart.set_quantity(shirt.id, i32::MAX));

    let result = cart.add_product(&shirt);

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, i32::MAX);
    assert!(cart.totals().total > 0.0);
}

#[test]
fn quantity_zero_or_below_removes_item() {
    let a = product("a", 100.0, 0.0);
    let b = product("b", 100.0, 0.0);
    let mut cart = Cart::default();
    cart.add_product(&a).expect("add");
    cart.add_product(&b).expect("add");

    assert!(cart.set_quantity(a.id, 0));
    assert!(cart.items.iter().all(|i| i.product_id != a.id));

    assert!(cart.set_quantity(b.id, -3));
    assert!(cart.is_empty());
}

#[test]
fn set_quantity_updates_existing_line() {
    let a = product("a", 100.0, 0.0);
    let mut cart = Cart::default();
    cart.add_product(&a).expect("add");

    assert!(cart.set_quantity(a.id, 5));
    assert_eq!(cart.items[0].quantity, 5);
}

#[test]
fn set_quantity_on_missing_product_reports_false() {
    let mut cart = Cart::default();
    assert!(!cart.set_quantity(Uuid::new_v4(), 3));
    assert!(!cart.set_quantity(Uuid::new_v4(), 0));
    assert!(!cart.remove(Uuid::new_v4()));
}

#[test]
fn totals_without_coupon() {
    let mut cart = Cart::default();
    let shirt = product("shirt", 500.0, 20.0);
    let mug = product("mug", 200.0, 0.0);
    cart.add_product(&shirt).expect("add");
    cart.add_product(&shirt).expect("add");
    cart.add_product(&mug).expect("add");

    let totals = cart.totals();
    assert_eq!(totals.item_count, 3);
    assert_close(totals.subtotal, 400.0 * 2.0 + 200.0);
    assert_close(totals.discount, 0.0);
    assert_close(totals.total, 1000.0);
}

#[test]
fn totals_apply_coupon_to_discounted_subtotal() {
    let mut cart = Cart::default();
    let shirt = product("shirt", 500.0, 20.0);
    cart.add_product(&shirt).expect("add");
    cart.set_quantity(shirt.id, 3);
    cart.apply_coupon(coupon("WELCOME10", 10.0));

    let totals = cart.totals();
    assert_close(totals.subtotal, 1200.0);
    assert_close(totals.discount, 120.0);
    assert_close(totals.total, 1080.0);
}

#[test]
fn clearing_coupon_restores_full_total() {
    let mut cart = Cart::default();
    cart.add_product(&product("shirt", 500.0, 0.0)).expect("add");
    cart.apply_coupon(coupon("HALF", 50.0));
    assert_close(cart.totals().total, 250.0);

    cart.apply_coupon(None);
    assert!(cart.coupon.is_none());
    assert_close(cart.totals().total, 500.0);
}

#[test]
fn totals_from_subtotal_matches_cart_totals() {
    let totals = CartTotals::from_subtotal(4, 1000.0, Some(25.0));
    assert_eq!(
        totals,
        CartTotals {
            item_count: 4,
            subtotal: 1000.0,
            discount: 250.0,
            total: 750.0,
        }
    );
}

#[test]
fn clear_empties_items_and_coupon() {
    let mut cart = Cart::default();
    cart.add_product(&product("shirt", 500.0, 0.0)).expect("add");
    cart.apply_coupon(coupon("WELCOME10", 10.0));

    cart.clear();

    assert!(cart.is_empty());
    assert!(cart.coupon.is_none());
    assert_eq!(cart.item_count(), 0);
    assert_close(cart.totals().total, 0.0);
}

#[test]
fn cart_items_serialize_as_json_array() {
    let mut cart = Cart::default();
    cart.add_product(&product("shirt", 500.0, 10.0)).expect("add");

    let value = serde_json::to_value(&cart.items).expect("serialize items");
    let array = value.as_array().expect("array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["quantity"], 1);
    assert_eq!(array[0]["name"], "shirt");
}

#[test]
fn cart_view_lines_carry_unit_price_and_line_total() {
    let id = Uuid::new_v4();
    let mut cart = Cart::default();
    let shirt = product("shirt", 500.0, 20.0);
    cart.add_product(&shirt).expect("add");
    cart.add_product(&shirt).expect("add");
    cart.apply_coupon(coupon("WELCOME10", 10.0));

    let view = CartView::new(id, &cart);
    assert_eq!(view.id, id);
    assert_eq!(view.items.len(), 1);
    assert_close(view.items[0].unit_price, 400.0);
    assert_close(view.items[0].line_total, 800.0);
    assert_eq!(view.item_count, 2);
    assert_close(view.subtotal, 800.0);
    assert_close(view.discount, 80.0);
    assert_close(view.total, 720.0);
    assert_eq!(view.coupon.as_ref().map(|c| c.code.as_str()), Some("WELCOME10"));
}

#[test]
fn order_confirmation_hides_customer_details() {
    let mut cart = Cart::default();
    cart.add_product(&product("shirt", 500.0, 0.0)).expect("add");
    cart.set_quantity(cart.items[0].product_id, 3);

    let order = Order {
        id: Uuid::new_v4(),
        customer_name: "Asha".into(),
        phone: "9999999999".into(),
        address: "12 Main Road".into(),
        pincode: "560001".into(),
        items: cart.items.clone(),
        coupon_applied: Some("WELCOME10".into()),
        total_price: 1350.0,
        created_at: Utc::now(),
    };

    let confirmation = OrderConfirmation::from(&order);
    assert_eq!(confirmation.id, order.id);
    assert_eq!(confirmation.item_count, 3);
    assert_close(confirmation.total_price, 1350.0);

    let json = serde_json::to_value(&confirmation).expect("serialize");
    assert!(json.get("phone").is_none());
    assert!(json.get("address").is_none());
}
