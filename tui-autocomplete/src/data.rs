//! Suggestion collections and the render state that mirrors them

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

/// An ordered, indexable collection of suggestions
///
/// The field only ever asks for the number of items and for the item at an
/// index. Integer-keyed maps count their entries and look items up by key.
pub trait SuggestionData {
    type Item;

    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&Self::Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> SuggestionData for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T> SuggestionData for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

impl<T> SuggestionData for VecDeque<T> {
    type Item = T;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        VecDeque::get(self, index)
    }
}

impl<T> SuggestionData for BTreeMap<usize, T> {
    type Item = T;

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        BTreeMap::get(self, &index)
    }
}

impl<T, S: std::hash::BuildHasher> SuggestionData for HashMap<usize, T, S> {
    type Item = T;

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        HashMap::get(self, &index)
    }
}

/// The field's copy of the caller's suggestions
///
/// Holds a shared reference to the most recently received collection. Every
/// sync replaces it outright; nothing is diffed or cached between syncs.
pub struct RenderState<D: SuggestionData + ?Sized> {
    data: Rc<D>,
}

impl<D: SuggestionData + ?Sized> RenderState<D> {
    pub fn new(data: Rc<D>) -> Self {
        Self { data }
    }

    /// Replace the held collection with `data`
    pub fn sync(&mut self, data: Rc<D>) {
        if !Rc::ptr_eq(&self.data, &data) {
            tracing::debug!(
                previous = self.data.len(),
                current = data.len(),
                "suggestions replaced"
            );
        }
        self.data = data;
    }

    pub fn data(&self) -> &Rc<D> {
        &self.data
    }

    pub fn item_count(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, index: usize) -> Option<&D::Item> {
        self.data.get(index)
    }

    /// Count/index view used by the list region
    pub fn model(&self) -> ListModel<'_, D> {
        ListModel { data: &self.data }
    }
}

/// The `() -> count` and `(index) -> item` pair the list is built from
pub struct ListModel<'a, D: SuggestionData + ?Sized> {
    data: &'a D,
}

impl<D: SuggestionData + ?Sized> Clone for ListModel<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: SuggestionData + ?Sized> Copy for ListModel<'_, D> {}

impl<'a, D: SuggestionData + ?Sized> ListModel<'a, D> {
    pub fn new(data: &'a D) -> Self {
        Self { data }
    }

    pub fn item_count(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, index: usize) -> Option<&'a D::Item> {
        self.data.get(index)
    }

    /// Items in index order, stopping at the first gap
    pub fn iter(&self) -> impl Iterator<Item = &'a D::Item> + 'a {
        let data = self.data;
        (0..data.len()).map_while(move |i| data.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_replaces_wholesale() {
        let mut state = RenderState::new(Rc::new(vec!["a", "b", "c"]));
        assert_eq!(state.item_count(), 3);

        state.sync(Rc::new(vec!["z"]));
        assert_eq!(state.item_count(), 1);
        assert_eq!(state.get(0), Some(&"z"));
        assert_eq!(state.get(1), None);
    }

    #[test]
    fn test_sync_keeps_callers_reference() {
        let data = Rc::new(vec![1, 2]);
        let mut state = RenderState::new(Rc::new(Vec::new()));
        state.sync(Rc::clone(&data));
        assert!(Rc::ptr_eq(state.data(), &data));
    }

    #[test]
    fn test_slice_data() {
        let data: Rc<[String]> = vec!["one".to_string(), "two".to_string()].into();
        let state = RenderState::new(data);
        assert_eq!(state.model().item_count(), 2);
        assert_eq!(state.model().get(1).map(String::as_str), Some("two"));
    }

    #[test]
    fn test_map_data_indexes_by_key() {
        let mut map: BTreeMap<usize, &str> = BTreeMap::new();
        map.insert(0, "zero");
        map.insert(1, "one");
        let model = ListModel::new(&map);

        assert_eq!(model.item_count(), 2);
        assert_eq!(model.get(1), Some(&"one"));
        assert_eq!(model.get(7), None);
    }

    #[test]
    fn test_iter_stops_at_gap() {
        let mut map: HashMap<usize, char> = HashMap::new();
        map.insert(0, 'a');
        map.insert(2, 'c');
        let items: Vec<_> = ListModel::new(&map).iter().copied().collect();
        assert_eq!(items, vec!['a']);
    }

    #[test]
    fn test_empty() {
        let data: VecDeque<u8> = VecDeque::new();
        assert!(SuggestionData::is_empty(&data));
    }
}
