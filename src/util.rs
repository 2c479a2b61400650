/// Construit une [`VecDeque`](std::collections::VecDeque) comme `vec!` construit un `Vec`.
///
/// Utilisée pour les chemins de commande, qui se remplissent par l'avant.
#[doc(alias = "std::collections::VecDeque")]
#[macro_export]
macro_rules! vdq {
    () => {
        std::collections::VecDeque::new()
    };
    ($($args:expr),+ $(,)?) => {
        {
            let mut v = std::collections::VecDeque::new();
            $(v.push_back($args);)+
            v
        }
    };
}
