/// Loyalty points earned by a delivered order: one point per unit of
/// loyalty-eligible product. The running balance is kept by the loyalty
/// service (ledger rows plus a cached total on the user).
pub fn points_for_quantity(eligible_quantity: i64) -> i64 {
    eligible_quantity
}
