use matchgen_expr::{Expr, Head};

use crate::{Binding, Subjects};

fn power() -> std::sync::Arc<Expr> {
    Expr::pow(Expr::symbol("x"), Expr::integer(2))
}

#[test]
fn test_take_restores_on_drop() {
    let mut subjects = Subjects::new(Expr::symbol("x"));
    {
        let taken = subjects.take().unwrap();
        assert_eq!(taken.item(), &Expr::symbol("x"));
        assert!(taken.is_exhausted());
    }
    assert_eq!(subjects.remaining(), 1);
    assert!(!subjects.is_exhausted());
}

#[test]
fn test_take_if_rejects_without_consuming() {
    let mut subjects = Subjects::new(Expr::symbol("x"));
    assert!(subjects.take_if(|e| e.as_integer().is_some()).is_none());
    assert_eq!(subjects.remaining(), 1);
}

#[test]
fn test_enter_and_close() {
    let mut subjects = Subjects::new(power());
    assert!(subjects.enter(&Head::ADD).is_none());
    {
        let mut entered = subjects.enter(&Head::POW).unwrap();
        assert_eq!(entered.depth(), 1);
        assert!(entered.close().is_none(), "level not yet consumed");

        let mut base = entered.take().unwrap();
        let mut exponent = base.take().unwrap();
        assert_eq!(exponent.item(), &Expr::integer(2));
        {
            let closed = exponent.close().unwrap();
            assert_eq!(closed.depth(), 0);
            assert!(closed.is_exhausted());
        }
        assert_eq!(exponent.depth(), 1);
    }
    assert_eq!(subjects.depth(), 0);
    assert_eq!(subjects.front(), Some(&power()));
}

#[test]
fn test_sequence_grows_and_restores_in_order() {
    let f = Expr::function("f", [Expr::symbol("a"), Expr::symbol("b"), Expr::symbol("c")]);
    let mut subjects = Subjects::new(f);
    let mut entered = subjects.enter(f_head()).unwrap();
    {
        let mut run = entered.take_sequence(1).unwrap();
        assert_eq!(run.run(), &[Expr::symbol("a")]);
        assert!(run.grow());
        assert!(run.grow());
        assert!(!run.grow());
        assert_eq!(run.binding(None), Binding::sequence([Expr::symbol("a"), Expr::symbol("b"), Expr::symbol("c")]));
        assert_eq!(run.remaining(), 0);
    }
    assert_eq!(entered.remaining(), 3);
    assert_eq!(entered.front(), Some(&Expr::symbol("a")));
    assert!(entered.take_sequence(4).is_none());
}

fn f_head() -> &'static Head {
    static HEAD: Head = Head::from_static("f", matchgen_expr::OpKind::Plain);
    &HEAD
}
