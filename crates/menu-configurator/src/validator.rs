//! Cardinality rules for modifier groups.
//!
//! Every function here is pure: it takes a group (or product) and a
//! selection and answers a question or returns the next selection.

use menu_commerce::catalog::{ModifierGroup, ModifierOption, ProductWithModifiers};

use crate::selection::Selection;

/// A group is satisfied once it holds at least `min_quantity` entries.
///
/// Optional groups are always satisfied.
pub fn is_group_satisfied(group: &ModifierGroup, selection: &Selection) -> bool {
    if !group.required {
        return true;
    }
    selection.count_in_group(group) >= group.min_quantity
}

/// Whether another option of `group` can be added without replacing one.
pub fn can_select_more(group: &ModifierGroup, selection: &Selection) -> bool {
    selection.count_in_group(group) < group.max_quantity
}

/// Toggle `option` within `group`.
///
/// - A selected option is removed.
/// - An unselected option is added while the group has room.
/// - In a full single-choice group the new option replaces the old one.
/// - In a full multi-choice group the toggle is refused (`None`).
pub fn toggle(group: &ModifierGroup, option: &ModifierOption, selection: &Selection) -> Option<Selection> {
    if selection.is_selected(&option.id) {
        return Some(selection.without_option(&option.id));
    }

    if can_select_more(group, selection) {
        return Some(selection.with_option(option));
    }

    if group.is_single_choice() {
        return Some(selection.without_group(group).with_option(option));
    }

    None
}

/// Required groups that are still short of their minimum, in display order.
pub fn unsatisfied_groups<'a>(
    product: &'a ProductWithModifiers,
    selection: &Selection,
) -> Vec<&'a ModifierGroup> {
    product
        .required_groups()
        .filter(|g| !is_group_satisfied(g, selection))
        .collect()
}

/// All required groups reach their minimum.
pub fn all_required_satisfied(product: &ProductWithModifiers, selection: &Selection) -> bool {
    product
        .required_groups()
        .all(|g| is_group_satisfied(g, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use menu_commerce::{Currency, Money, ModifierOptionId};

    fn brl(cents: i64) -> Money {
        Money::new(cents, Currency::BRL)
    }

    fn opt(id: &str, cents: i64) -> ModifierOption {
        ModifierOption::new(id, id, brl(cents))
    }

    fn sizes() -> ModifierGroup {
        ModifierGroup::new("tamanho", "Tamanho", 1, 1)
            .required()
            .with_option(opt("p", 0))
            .with_option(opt("m", 300))
            .with_option(opt("g", 600))
    }

    fn toppings() -> ModifierGroup {
        ModifierGroup::new("adicionais", "Adicionais", 0, 2)
            .with_option(opt("leite-ninho", 300))
            .with_option(opt("pacoca", 200))
            .with_option(opt("granola", 150))
    }

    fn ids(selection: &Selection) -> Vec<&str> {
        selection.entries().iter().map(|m| m.option_id.as_str()).collect()
    }

    #[test]
    fn test_single_choice_replaces() {
        let g = sizes();
        let s = toggle(&g, &g.options[0], &Selection::new()).unwrap();
        let s = toggle(&g, &g.options[2], &s).unwrap();

        assert_eq!(ids(&s), vec!["g"]);
        assert_eq!(s.count_in_group(&g), 1);
    }

    #[test]
    fn test_multi_choice_caps_at_max() {
        let g = toppings();
        let s = toggle(&g, &g.options[0], &Selection::new()).unwrap();
        let s = toggle(&g, &g.options[1], &s).unwrap();

        assert!(!can_select_more(&g, &s));
        assert!(toggle(&g, &g.options[2], &s).is_none());
        assert_eq!(ids(&s), vec!["leite-ninho", "pacoca"]);
    }

    #[test]
    fn test_deselect_frees_room() {
        let g = toppings();
        let s = toggle(&g, &g.options[0], &Selection::new()).unwrap();
        let s = toggle(&g, &g.options[1], &s).unwrap();
        let s = toggle(&g, &g.options[0], &s).unwrap();
        let s = toggle(&g, &g.options[2], &s).unwrap();

        assert_eq!(ids(&s), vec!["pacoca", "granola"]);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let sizes = sizes();
        let toppings = toppings();
        let before = toggle(&sizes, &sizes.options[1], &Selection::new()).unwrap();
        let before = toggle(&toppings, &toppings.options[2], &before).unwrap();

        let on = toggle(&toppings, &toppings.options[0], &before).unwrap();
        let off = toggle(&toppings, &toppings.options[0], &on).unwrap();

        assert_eq!(off, before);
    }

    #[test]
    fn test_required_group_satisfaction() {
        let g = sizes();
        assert!(!is_group_satisfied(&g, &Selection::new()));

        let s = toggle(&g, &g.options[1], &Selection::new()).unwrap();
        assert!(is_group_satisfied(&g, &s));

        let optional = toppings();
        assert!(is_group_satisfied(&optional, &Selection::new()));
    }

    #[test]
    fn test_required_with_zero_min_is_satisfied_empty() {
        let g = ModifierGroup::new("borda", "Borda", 0, 1)
            .required()
            .with_option(opt("catupiry", 800));
        assert!(is_group_satisfied(&g, &Selection::new()));
    }

    #[test]
    fn test_unsatisfied_groups_in_order() {
        let product = ProductWithModifiers::new("acai-500", "Açaí 500ml", brl(1800))
            .with_group(sizes())
            .with_group(toppings())
            .with_group(
                ModifierGroup::new("fruta", "Fruta", 1, 1)
                    .required()
                    .with_option(opt("banana", 0)),
            );

        let missing: Vec<&str> = unsatisfied_groups(&product, &Selection::new())
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(missing, vec!["tamanho", "fruta"]);

        let s = toggle(&product.modifier_groups[2], &product.modifier_groups[2].options[0], &Selection::new())
            .unwrap();
        assert_eq!(unsatisfied_groups(&product, &s).len(), 1);
        assert!(!all_required_satisfied(&product, &s));
        assert!(!s.is_selected(&ModifierOptionId::new("p")));
    }
}
