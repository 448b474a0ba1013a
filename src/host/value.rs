//! Host Object Model
//!
//! The probe never owns the scene. It reads host objects through the handles
//! defined here, which mirror a dynamically-typed object heap:
//!
//! - [`ObjectRef`]: a shared record with an optional constructor and an
//!   insertion-ordered property map
//! - [`ListRef`]: a shared ordered sequence
//! - [`ClassRef`]: a constructor identity token
//! - [`FunctionRef`]: an opaque callable, never serialized
//!
//! # Identity
//!
//! Objects, lists and classes compare by pointer identity, never by contents.
//! Two classes both named `Sprite` are different types if they are different
//! constructors.
//!
//! # Locking
//!
//! Property maps sit behind a `parking_lot::RwLock`. Accessors that return
//! several values ([`ObjectRef::entries`], [`ListRef::items`]) copy them out so
//! that no lock is held while a caller descends into children.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

/// Identity token of an object or list (pointer identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

/// Identity token of a constructor (pointer identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

// ============================================================================
// Value
// ============================================================================

/// A single host value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(Arc<str>),
    List(ListRef),
    Object(ObjectRef),
    Class(ClassRef),
    Function(FunctionRef),
}

impl Value {
    #[inline]
    fn is_container(&self) -> bool {
        matches!(self, Self::Object(_) | Self::List(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Returns `true` for constructors and functions.
    #[inline]
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Class(_) | Self::Function(_))
    }

    /// Returns `true` for values that carry no nested references.
    #[inline]
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_)
        )
    }

    /// Identity of the referenced object or list, if this value is one.
    #[must_use]
    pub fn identity(&self) -> Option<ObjectId> {
        match self {
            Self::Object(o) => Some(o.id()),
            Self::List(l) => Some(l.id()),
            _ => None,
        }
    }

    /// Reads one property step.
    ///
    /// Objects resolve `key` as a property name; lists resolve it as a
    /// decimal index. Every other value has no properties.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<Value> {
        match self {
            Self::Object(o) => o.get(key),
            Self::List(l) => key.parse::<usize>().ok().and_then(|i| l.get(i)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Self::Object(o)
    }
}

impl From<&ObjectRef> for Value {
    fn from(o: &ObjectRef) -> Self {
        Self::Object(o.clone())
    }
}

impl From<ListRef> for Value {
    fn from(l: ListRef) -> Self {
        Self::List(l)
    }
}

impl From<ClassRef> for Value {
    fn from(c: ClassRef) -> Self {
        Self::Class(c)
    }
}

impl From<&ClassRef> for Value {
    fn from(c: &ClassRef) -> Self {
        Self::Class(c.clone())
    }
}

impl From<FunctionRef> for Value {
    fn from(f: FunctionRef) -> Self {
        Self::Function(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(ListRef::from_values(items))
    }
}

// ============================================================================
// ObjectRef
// ============================================================================

struct ObjectData {
    class: Option<ClassRef>,
    props: RwLock<IndexMap<Arc<str>, Value>>,
}

/// Releasing the last handle to a long `next` chain must not recurse once
/// per link, so nested objects and lists are torn down from a work list.
impl Drop for ObjectData {
    fn drop(&mut self) {
        let props = self.props.get_mut();
        if props.values().any(Value::is_container) {
            release_nested(props.drain(..).map(|(_, value)| value).collect());
        }
    }
}

/// Shared handle to a host object.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectData>);

impl ObjectRef {
    /// Creates a plain object with no constructor.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(ObjectData {
            class: None,
            props: RwLock::new(IndexMap::new()),
        }))
    }

    /// Creates an object constructed by `class`.
    #[must_use]
    pub fn instance(class: &ClassRef) -> Self {
        Self(Arc::new(ObjectData {
            class: Some(class.clone()),
            props: RwLock::new(IndexMap::new()),
        }))
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.0).cast::<()>() as usize)
    }

    /// The constructor that produced this object, if any.
    #[inline]
    #[must_use]
    pub fn class(&self) -> Option<&ClassRef> {
        self.0.class.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.props.read().get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.props.read().contains_key(key)
    }

    /// Inserts or overwrites a property. Overwriting keeps the original
    /// insertion position.
    pub fn set(&self, key: impl Into<Arc<str>>, value: impl Into<Value>) {
        self.0.props.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.props.write().shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.props.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.props.read().is_empty()
    }

    /// Property names in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<Arc<str>> {
        self.0.props.read().keys().cloned().collect()
    }

    /// Copy of all properties in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(Arc<str>, Value)> {
        self.0
            .props
            .read()
            .iter()
            .map(|(k, v)| (Arc::clone(k), v.clone()))
            .collect()
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_f64())
    }

    #[must_use]
    pub fn get_object(&self, key: &str) -> Option<ObjectRef> {
        match self.get(key)? {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Object children, in order. `None` when the object has no `children`
    /// list at all; non-object entries are skipped.
    #[must_use]
    pub fn children(&self) -> Option<Vec<ObjectRef>> {
        match self.get("children")? {
            Value::List(list) => Some(list.objects()),
            _ => None,
        }
    }

    /// Appends `child` to this object's `children` list (creating it when
    /// absent) and points the child's `parent` back at this object.
    pub fn add_child(&self, child: &ObjectRef) {
        let list = match self.get("children") {
            Some(Value::List(list)) => list,
            _ => {
                let list = ListRef::new();
                self.set("children", list.clone());
                list
            }
        };
        list.push(child.clone());
        child.set("parent", self.clone());
    }

    /// Follows `path` one property at a time. Returns `None` as soon as a
    /// step is missing or the path is empty.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.get(first.as_ref())?;
        for segment in rest {
            current = current.property(segment.as_ref())?;
        }
        Some(current)
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl std::hash::Hash for ObjectRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

// Host graphs are routinely cyclic (`parent` links), so never print contents.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.class().map_or("Object", ClassRef::name);
        write!(f, "{class}@{:#x}", self.id().0)
    }
}

// ============================================================================
// ListRef
// ============================================================================

/// Shared handle to a host list.
#[derive(Clone, Default)]
pub struct ListRef(Arc<RwLock<Vec<Value>>>);

impl ListRef {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_values(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    #[must_use]
    pub fn from_objects<'a>(objects: impl IntoIterator<Item = &'a ObjectRef>) -> Self {
        Self::from_values(objects.into_iter().map(Value::from).collect())
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.0).cast::<()>() as usize)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.write().push(value.into());
    }

    /// Removes every element that refers to `object`.
    pub fn remove_object(&self, object: &ObjectRef) {
        self.0
            .write()
            .retain(|v| v.as_object().is_none_or(|o| !o.ptr_eq(object)));
    }

    /// Copy of all elements.
    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Copy of the object elements, skipping everything else.
    #[must_use]
    pub fn objects(&self) -> Vec<ObjectRef> {
        self.0
            .read()
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect()
    }
}

impl Drop for ListRef {
    fn drop(&mut self) {
        if let Some(lock) = Arc::get_mut(&mut self.0) {
            let items = lock.get_mut();
            if items.iter().any(Value::is_container) {
                release_nested(std::mem::take(items));
            }
        }
    }
}

/// Drops `pending` without recursing: each uniquely-owned object or list has
/// its contents moved onto the work list before its own handle goes away.
fn release_nested(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Object(mut object) => {
                if let Some(data) = Arc::get_mut(&mut object.0) {
                    pending.extend(data.props.get_mut().drain(..).map(|(_, value)| value));
                }
            }
            Value::List(mut list) => {
                if let Some(lock) = Arc::get_mut(&mut list.0) {
                    pending.append(lock.get_mut());
                }
            }
            _ => {}
        }
    }
}

impl PartialEq for ListRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ListRef {}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "List[{}]@{:#x}", self.len(), self.id().0)
    }
}

// ============================================================================
// ClassRef / FunctionRef
// ============================================================================

#[derive(Debug)]
struct ClassData {
    name: Arc<str>,
}

/// Constructor identity token.
///
/// Carries the constructor's own (unqualified) name, which is what a type
/// lookup falls back to when the constructor was never discovered.
#[derive(Clone)]
pub struct ClassRef(Arc<ClassData>);

impl ClassRef {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(Arc::new(ClassData { name: name.into() }))
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> ClassId {
        ClassId(Arc::as_ptr(&self.0) as usize)
    }

    /// The constructor's own name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ClassRef {}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.name())
    }
}

/// Opaque reference to a host function. Only its name is observable.
#[derive(Debug, Clone)]
pub struct FunctionRef(Arc<str>);

impl FunctionRef {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}
